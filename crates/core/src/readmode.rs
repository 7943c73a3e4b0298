//! Main extraction API.
//!
//! [`ReadMode`] bundles a [`SiteConfigRegistry`] with a configured
//! [`ContentLocator`]. It is what [`ReadingSession`](crate::ReadingSession)
//! uses under the hood, and what one-off callers use directly.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::readmode::parse_with_url;
//!
//! let body = "Reading mode keeps the words and drops the rest. ".repeat(12);
//! let html = format!("<html><head><title>Post</title></head><body><article><h1>A Quiet Post</h1><p>{}</p></article></body></html>", body);
//!
//! let result = parse_with_url(&html, "https://blog.example.com/post").unwrap();
//! assert_eq!(result.title, "A Quiet Post");
//! assert_eq!(result.source_url.as_deref(), Some("https://blog.example.com/post"));
//! ```

use crate::extract::{ContentLocator, ExtractConfig};
use crate::parse::Document;
use crate::result::ExtractionResult;
use crate::sanitize::SanitizeConfig;
use crate::siteconfig::SiteConfigRegistry;
use crate::Result;

/// Configuration for [`ReadMode`].
///
/// # Example
///
/// ```rust
/// use readmode_core::ReadModeConfig;
///
/// let config = ReadModeConfig::builder()
///     .min_text_length(500)
///     .min_word_count(80)
///     .strip_attributes(false)
///     .build();
/// assert_eq!(config.extract.min_text_length, 500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReadModeConfig {
    /// Text-sufficiency thresholds.
    pub extract: ExtractConfig,

    /// Cleanup settings.
    pub sanitize: SanitizeConfig,
}

impl ReadModeConfig {
    /// Creates a new builder for ReadModeConfig.
    pub fn builder() -> ReadModeConfigBuilder {
        ReadModeConfigBuilder::new()
    }
}

/// Builder for ReadModeConfig.
#[derive(Debug, Default)]
pub struct ReadModeConfigBuilder {
    config: ReadModeConfig,
}

impl ReadModeConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ReadModeConfig::default() }
    }

    /// Sets the minimum character count (exclusive, default 300).
    pub fn min_text_length(mut self, value: usize) -> Self {
        self.config.extract.min_text_length = value;
        self
    }

    /// Sets the minimum word count (exclusive, default 50).
    pub fn min_word_count(mut self, value: usize) -> Self {
        self.config.extract.min_word_count = value;
        self
    }

    /// Replaces the attribute allow-list.
    pub fn allowed_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.sanitize.allowed_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the maximum number of empty-element passes.
    pub fn max_empty_passes(mut self, value: usize) -> Self {
        self.config.sanitize.max_empty_passes = value;
        self
    }

    /// Enables or disables attribute stripping.
    pub fn strip_attributes(mut self, value: bool) -> Self {
        self.config.sanitize.strip_attributes = value;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ReadModeConfig {
        self.config
    }
}

/// Main entry point for content extraction.
///
/// # Example
///
/// ```rust
/// use readmode_core::{ReadMode, ReadModeError};
///
/// let reader = ReadMode::new();
/// let err = reader.parse("<html><body><p>Too short</p></body></html>").unwrap_err();
/// assert!(matches!(err, ReadModeError::NoContent));
/// ```
#[derive(Debug, Clone)]
pub struct ReadMode {
    config: ReadModeConfig,
    registry: SiteConfigRegistry,
    locator: ContentLocator,
}

impl ReadMode {
    /// Creates a reader with the built-in site table and default settings.
    pub fn new() -> Self {
        Self::with_config(ReadModeConfig::default())
    }

    /// Creates a reader with a custom configuration.
    pub fn with_config(config: ReadModeConfig) -> Self {
        Self::with_registry(config, SiteConfigRegistry::builtin())
    }

    /// Creates a reader with a custom configuration and site registry.
    pub fn with_registry(config: ReadModeConfig, registry: SiteConfigRegistry) -> Self {
        let locator = ContentLocator::new(config.extract, config.sanitize.clone());
        Self { config, registry, locator }
    }

    /// Creates a reader whose registry also holds the site config files
    /// found in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::Io`](crate::ReadModeError::Io) if the
    /// directory exists but cannot be read.
    #[cfg(feature = "siteconfig")]
    pub fn with_config_dir<P: AsRef<std::path::Path>>(config: ReadModeConfig, dir: P) -> Result<Self> {
        let loader = crate::siteconfig::ConfigLoaderBuilder::new().custom_dir(dir).build();
        Ok(Self::with_registry(config, loader.registry()?))
    }

    /// Gets the configuration.
    pub fn config(&self) -> &ReadModeConfig {
        &self.config
    }

    /// Gets the site registry.
    pub fn registry(&self) -> &SiteConfigRegistry {
        &self.registry
    }

    /// Gets the site registry for registering more sites.
    pub fn registry_mut(&mut self) -> &mut SiteConfigRegistry {
        &mut self.registry
    }

    /// Parses HTML and extracts its main content.
    ///
    /// Without a URL the default site configuration applies.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::NoContent`](crate::ReadModeError::NoContent)
    /// if no strategy finds enough text.
    pub fn parse(&self, html: &str) -> Result<ExtractionResult> {
        let doc = Document::parse(html)?;
        self.extract(&doc)
    }

    /// Parses HTML served from `url` and extracts its main content.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::InvalidUrl`](crate::ReadModeError::InvalidUrl)
    /// if the URL is invalid, or `NoContent` as for [`parse`](Self::parse).
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<ExtractionResult> {
        let doc = Document::parse_with_url(html, url)?;
        self.extract(&doc)
    }

    /// Extracts the main content of an already parsed page.
    pub fn extract(&self, doc: &Document) -> Result<ExtractionResult> {
        self.locator.extract(doc, &self.registry)
    }

    /// Checks whether extraction would succeed, without cleaning anything.
    pub fn is_probably_readable(&self, doc: &Document) -> bool {
        let site = match doc.hostname() {
            Some(hostname) => self.registry.resolve(hostname),
            None => self.registry.default_config(),
        };
        self.locator.find_candidate(doc, site).is_some()
    }
}

impl Default for ReadMode {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function for one-liner extraction with defaults.
pub fn parse(html: &str) -> Result<ExtractionResult> {
    ReadMode::new().parse(html)
}

/// Convenience function for one-liner extraction with URL context.
pub fn parse_with_url(html: &str, url: &str) -> Result<ExtractionResult> {
    ReadMode::new().parse_with_url(html, url)
}

/// Convenience function for a quick readability check.
pub fn is_probably_readable(html: &str) -> bool {
    Document::parse(html).map(|doc| ReadMode::new().is_probably_readable(&doc)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReadModeError;
    use crate::extract::Strategy;
    use crate::siteconfig::SiteConfig;

    fn article_page(words: usize) -> String {
        format!(
            r#"<html><head><title>Page Title - Site</title></head><body>
                <nav><a href="/">Home</a></nav>
                <article class="post"><h1>An Article Headline</h1><p>{}</p></article>
            </body></html>"#,
            "word ".repeat(words)
        )
    }

    #[test]
    fn test_builder() {
        let config = ReadModeConfig::builder()
            .min_text_length(10)
            .min_word_count(2)
            .allowed_attributes(["href"])
            .max_empty_passes(1)
            .strip_attributes(false)
            .build();

        assert_eq!(config.extract, ExtractConfig { min_text_length: 10, min_word_count: 2 });
        assert_eq!(config.sanitize.allowed_attributes, vec!["href".to_string()]);
        assert_eq!(config.sanitize.max_empty_passes, 1);
        assert!(!config.sanitize.strip_attributes);
    }

    #[test]
    fn test_parse() {
        let result = ReadMode::new().parse(&article_page(100)).unwrap();

        assert_eq!(result.title, "An Article Headline");
        assert_eq!(result.strategy, Strategy::ConfiguredSelectors);
        assert!(!result.text().contains("Home"));
        assert!(result.source_url.is_none());
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let html = article_page(20);
        assert!(matches!(ReadMode::new().parse(&html), Err(ReadModeError::NoContent)));

        let lenient = ReadMode::with_config(ReadModeConfig::builder().min_text_length(50).min_word_count(10).build());
        assert!(lenient.parse(&html).is_ok());
    }

    #[test]
    fn test_parse_with_invalid_url() {
        let result = ReadMode::new().parse_with_url(&article_page(100), "not a url");
        assert!(matches!(result, Err(ReadModeError::InvalidUrl(_))));
    }

    #[test]
    fn test_registry_mut() {
        let html = format!(
            r#"<html><body><div id="story-body"><p>{}</p></div><article><p>tiny</p></article></body></html>"#,
            "word ".repeat(100)
        );
        let mut reader = ReadMode::new();
        reader.registry_mut().register("news.example", SiteConfig::article(&["#story-body"]));

        let result = reader.parse_with_url(&html, "https://news.example/a").unwrap();
        assert_eq!(result.strategy, Strategy::ConfiguredSelectors);
        assert_eq!(result.content.root_tag(), "div");
    }

    #[test]
    fn test_is_probably_readable() {
        assert!(is_probably_readable(&article_page(100)));
        assert!(!is_probably_readable("<html><body><nav><a href=\"#\">Link</a></nav></body></html>"));
    }

    #[cfg(feature = "siteconfig")]
    #[test]
    fn test_with_config_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("news.example.txt"), "main: #story-body\n").unwrap();

        let reader = ReadMode::with_config_dir(ReadModeConfig::default(), dir.path()).unwrap();
        assert_eq!(reader.registry().resolve("news.example").main_selectors, vec!["#story-body".to_string()]);
    }
}
