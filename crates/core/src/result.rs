//! Extraction output and format conversion.
//!
//! [`ExtractionResult`] is what a presenter receives when reading mode
//! activates: the resolved title, the cleaned content and where it came
//! from. It is created once per activation and never cached.

use crate::extract::Strategy;
use crate::formatters::html::{HtmlConfig, render_reading_view};
use crate::formatters::json::{JsonConfig, convert_to_json};
use crate::formatters::markdown::{MarkdownConfig, convert_to_markdown};
use crate::formatters::text::{TextConfig, convert_to_text};
use crate::fragment::ContentFragment;
use crate::{ReadModeError, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[\w'-]+\b").expect("valid pattern"));

/// Words per minute used for reading time estimates.
const WORDS_PER_MINUTE: f64 = 200.0;

/// Output format options for extracted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Standalone reading-view HTML document.
    #[default]
    Html,
    /// Markdown with TOML frontmatter.
    Markdown,
    /// Plain text.
    PlainText,
    /// JSON (structured data).
    Json,
}

impl FromStr for OutputFormat {
    type Err = ReadModeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "text" | "txt" | "plain" => Ok(OutputFormat::PlainText),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ReadModeError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "markdown",
            OutputFormat::PlainText => "text",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// The cleaned main content of a page.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Resolved article title.
    pub title: String,

    /// Cleaned, detached copy of the content. Serializes as HTML.
    pub content: ContentFragment,

    /// Page URL, when the page was loaded from one.
    pub source_url: Option<String>,

    /// The cascade step that found the content.
    pub strategy: Strategy,
}

impl ExtractionResult {
    /// Plain text of the content.
    pub fn text(&self) -> String {
        self.content.text()
    }

    /// Inner HTML of the content root.
    pub fn content_html(&self) -> String {
        self.content.inner_html()
    }

    /// Number of words in the content.
    pub fn word_count(&self) -> usize {
        count_words(&self.text())
    }

    /// Estimated reading time in minutes.
    pub fn reading_time(&self) -> f64 {
        self.word_count() as f64 / WORDS_PER_MINUTE
    }

    /// Converts the result to the specified format with default settings.
    pub fn to_format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Html => Ok(self.to_html()),
            OutputFormat::Markdown => self.to_markdown(),
            OutputFormat::PlainText => convert_to_text(self, &TextConfig::default()),
            OutputFormat::Json => convert_to_json(self, &JsonConfig::default()),
        }
    }

    /// Renders the reading view as a standalone HTML document.
    pub fn to_html(&self) -> String {
        render_reading_view(self, &HtmlConfig::default())
    }

    /// Gets content as Markdown with TOML frontmatter.
    pub fn to_markdown(&self) -> Result<String> {
        convert_to_markdown(self, &MarkdownConfig { include_frontmatter: true, ..Default::default() })
    }

    /// Gets the whole result as a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Count words in text using a simple regex pattern
pub(crate) fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// Small result for formatter tests.
#[cfg(test)]
pub(crate) fn sample_result() -> ExtractionResult {
    use crate::parse::Document;

    let doc = Document::parse(
        r#"<html><body><article><h2>Intro</h2> <p>It's a well-known fact that tests help.</p></article></body></html>"#,
    )
    .unwrap();
    let article = doc.select_first("article").unwrap().unwrap();
    ExtractionResult {
        title: "Sample <Title>".to_string(),
        content: ContentFragment::from_element(&article),
        source_url: Some("https://example.com/post?a=1&b=2".to_string()),
        strategy: Strategy::ConfiguredSelectors,
    }
}
