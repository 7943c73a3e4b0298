use crate::Result;
use crate::extract::Strategy;
use crate::formatters::markdown::{LinkReference, MarkdownConfig, convert_to_markdown, extract_links};
use crate::formatters::text::{TextConfig, convert_to_text};
use crate::result::ExtractionResult;
use serde::Serialize;

/// Complete JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Resolved title
    pub title: String,
    /// Page URL, if known
    pub source_url: Option<String>,
    /// Cascade step that found the content
    pub strategy: Strategy,
    /// Number of words in the content
    pub word_count: usize,
    /// Estimated reading time in minutes
    pub reading_time_minutes: f64,
    /// Content in multiple formats
    pub content: ContentFormats,
    /// Optional references array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<JsonReference>>,
}

/// Content in multiple formats
#[derive(Debug, Clone, Serialize)]
pub struct ContentFormats {
    /// Content as HTML
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Content as Markdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    /// Content as plain text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A reference link for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct JsonReference {
    /// Reference index
    pub index: usize,
    /// Link text
    pub text: String,
    /// Link URL
    pub url: String,
}

/// Configuration for JSON output
#[derive(Debug, Clone)]
pub struct JsonConfig {
    /// Include HTML in output
    pub include_html: bool,
    /// Include Markdown in output
    pub include_markdown: bool,
    /// Include plain text in output
    pub include_text: bool,
    /// Include references array
    pub include_references: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { include_html: true, include_markdown: false, include_text: true, include_references: false, pretty: true }
    }
}

/// Number references from 1 in document order
fn to_references(links: Vec<LinkReference>) -> Vec<JsonReference> {
    links
        .into_iter()
        .enumerate()
        .map(|(i, link)| JsonReference { index: i + 1, text: link.text, url: link.url })
        .collect()
}

/// Convert extracted content to JSON format
pub fn convert_to_json(result: &ExtractionResult, config: &JsonConfig) -> Result<String> {
    let html = result.content_html();

    let content = ContentFormats {
        html: if config.include_html { Some(html.clone()) } else { None },
        markdown: if config.include_markdown {
            Some(convert_to_markdown(result, &MarkdownConfig::default())?)
        } else {
            None
        },
        text: if config.include_text { Some(convert_to_text(result, &TextConfig::default())?) } else { None },
    };

    let references = if config.include_references { Some(to_references(extract_links(&html))) } else { None };

    let output = JsonOutput {
        title: result.title.clone(),
        source_url: result.source_url.clone(),
        strategy: result.strategy,
        word_count: result.word_count(),
        reading_time_minutes: result.reading_time(),
        content,
        references,
    };

    if config.pretty { Ok(serde_json::to_string_pretty(&output)?) } else { Ok(serde_json::to_string(&output)?) }
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, result: &ExtractionResult) -> Result<String> {
        convert_to_json(result, &self.config)
    }
}
