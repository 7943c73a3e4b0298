use crate::Result;
use crate::result::ExtractionResult;
use scraper::Html;
use std::collections::HashSet;

/// Configuration for Markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with title, source and metrics
    pub include_frontmatter: bool,
    /// Generate reference table for all links
    pub include_references: bool,
    /// Strip images from output
    pub strip_images: bool,
    /// Include title as H1 heading at the start of content
    pub include_title_heading: bool,
}

/// A collected link reference
#[derive(Debug, Clone, PartialEq)]
pub struct LinkReference {
    /// The link text
    pub text: String,
    /// The link URL
    pub url: String,
}

/// Convert extracted content to Markdown with optional frontmatter and references
pub fn convert_to_markdown(result: &ExtractionResult, config: &MarkdownConfig) -> Result<String> {
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(result));
        output.push('\n');
    }

    if config.include_title_heading && !result.title.is_empty() {
        output.push_str(&format!("# {}\n\n", result.title));
    }

    let html = if config.strip_images {
        let mut content = result.content.clone();
        content.remove_matching("img")?;
        content.inner_html()
    } else {
        result.content_html()
    };

    output.push_str(html_to_markdown(&html).trim());

    if config.include_references {
        let links = extract_links(&html);
        if !links.is_empty() {
            output.push_str("\n\n## References\n\n");
            output.push_str(&generate_reference_table(&links));
        }
    }

    Ok(output)
}

/// Generate TOML frontmatter
fn generate_frontmatter(result: &ExtractionResult) -> String {
    let mut frontmatter = String::from("+++");

    frontmatter.push_str(&format!("\ntitle = {}", toml_escape_string(&result.title)));

    if let Some(url) = &result.source_url {
        frontmatter.push_str(&format!("\nsource = {}", toml_escape_string(url)));
    }

    frontmatter.push_str(&format!("\nstrategy = \"{}\"", result.strategy));
    frontmatter.push_str(&format!("\nword_count = {}", result.word_count()));
    frontmatter.push_str(&format!("\nreading_time_minutes = {:.1}", result.reading_time()));
    frontmatter.push_str("\n+++\n");

    frontmatter
}

/// Escape a string for TOML format
fn toml_escape_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

/// Convert HTML to Markdown using htmd crate
#[cfg(feature = "markdown")]
fn html_to_markdown(html: &str) -> String {
    htmd::convert(html).unwrap_or_default()
}

/// Fallback HTML to text conversion when markdown feature is disabled
#[cfg(not(feature = "markdown"))]
fn html_to_markdown(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect::<String>()
}

/// Extract all links from HTML content, first occurrence of each URL
pub fn extract_links(html: &str) -> Vec<LinkReference> {
    let document = Html::parse_fragment(html);
    let mut seen_urls = HashSet::new();
    let mut links = Vec::new();

    for element in document.root_element().descendants().filter_map(scraper::ElementRef::wrap) {
        if element.value().name() != "a" {
            continue;
        }
        let Some(url) = element.value().attr("href") else {
            continue;
        };
        let text = element.text().collect::<String>().trim().to_string();

        if text.is_empty() || url.is_empty() {
            continue;
        }

        if seen_urls.insert(url.to_string()) {
            links.push(LinkReference { text, url: url.to_string() });
        }
    }

    links
}

/// Generate a reference table from collected links
fn generate_reference_table(links: &[LinkReference]) -> String {
    let mut table = String::from("| # | Text | URL |\n");
    table.push_str("|---|------|-----|\n");

    for (i, link) in links.iter().enumerate() {
        table.push_str(&format!("| {} | {} | {} |\n", i + 1, escape_pipe(&link.text), escape_pipe(&link.url)));
    }

    table
}

/// Escape pipe characters for Markdown tables
fn escape_pipe(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Markdown formatter with configurable options
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, result: &ExtractionResult) -> Result<String> {
        convert_to_markdown(result, &self.config)
    }
}
