//! Page input from URLs, files, and stdin.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use reqwest::Client;
use url::Url;

/// HTTP client settings for fetching pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: concat!("Mozilla/5.0 (compatible; readmode/", env!("CARGO_PKG_VERSION"), ")").to_string(),
        }
    }
}

/// Where the page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Url(Url),
    File(PathBuf),
}

impl Input {
    /// `-` is stdin, `http(s)://` is a URL, anything else a file path.
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            Ok(Self::Stdin)
        } else if input.starts_with("http://") || input.starts_with("https://") {
            let url = Url::parse(input).with_context(|| format!("Invalid URL: {}", input))?;
            Ok(Self::Url(url))
        } else {
            Ok(Self::File(PathBuf::from(input)))
        }
    }

    /// The page URL, when the input is one.
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Url(url) => Some(url),
            _ => None,
        }
    }

    /// Reads the page HTML.
    pub async fn read(&self, config: &FetchConfig) -> anyhow::Result<String> {
        match self {
            Self::Stdin => read_stdin(),
            Self::Url(url) => fetch_url(url, config).await,
            Self::File(path) => read_file(path),
        }
    }
}

/// Fetches a page over HTTP, following redirects.
pub async fn fetch_url(url: &Url, config: &FetchConfig) -> anyhow::Result<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .context("Failed to build HTTP client")?;

    tracing::debug!(%url, timeout = config.timeout, "fetching page");

    let response = client
        .get(url.clone())
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!("Request timed out after {} seconds", config.timeout)
            } else {
                anyhow::Error::new(e).context(format!("Failed to fetch {}", url))
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        bail!("Server returned {} for {}", status, url);
    }

    response.text().await.context("Failed to read response body")
}

pub fn read_file(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

pub fn read_stdin() -> anyhow::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("readmode"));
    }

    #[test]
    fn test_input_parse() {
        assert_eq!(Input::parse("-").unwrap(), Input::Stdin);
        assert_eq!(Input::parse("page.html").unwrap(), Input::File(PathBuf::from("page.html")));

        let input = Input::parse("https://example.com/post").unwrap();
        assert_eq!(input.url().map(|u| u.host_str()), Some(Some("example.com")));
    }

    #[test]
    fn test_input_parse_invalid_url() {
        assert!(Input::parse("http://").is_err());
    }

    #[test]
    fn test_read_file_not_found() {
        let err = read_file(Path::new("/nonexistent/path/file.html")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
