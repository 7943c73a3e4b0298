use crate::Result;
use crate::result::ExtractionResult;
use scraper::ElementRef;

const BLOCK_ELEMENTS: [&str; 17] = [
    "p",
    "div",
    "section",
    "article",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "blockquote",
    "pre",
    "td",
    "th",
    "figcaption",
    "dd",
];

/// Configuration for plain text output
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Separate blocks with blank lines
    pub preserve_paragraphs: bool,

    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,

    /// Include title and source header
    pub include_header: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { preserve_paragraphs: true, line_width: 0, include_header: false }
    }
}

/// Plain text formatter for extracted content
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, result: &ExtractionResult) -> Result<String> {
        convert_to_text(result, &self.config)
    }
}

/// Convert extracted content to plain text with specified configuration
pub fn convert_to_text(result: &ExtractionResult, config: &TextConfig) -> Result<String> {
    let mut output = String::new();

    if config.include_header {
        output.push_str(&generate_header(result));
        output.push_str("\n\n");
    }

    let blocks = match result.content.root() {
        Some(root) if config.preserve_paragraphs => block_texts(root),
        Some(root) => vec![collapse_whitespace(&root.text().collect::<String>())],
        None => Vec::new(),
    };

    let text = if config.line_width > 0 {
        blocks.iter().map(|block| wrap_text(block, config.line_width)).collect::<Vec<_>>().join("\n\n")
    } else {
        blocks.join("\n\n")
    };

    output.push_str(&text);

    Ok(output.trim().to_string())
}

/// Generate a header from the title and source
fn generate_header(result: &ExtractionResult) -> String {
    let mut header = String::new();

    if !result.title.is_empty() {
        header.push_str(&result.title);
        header.push('\n');
        header.push_str(&"=".repeat(result.title.chars().count()));
        header.push('\n');
    }

    if let Some(url) = &result.source_url {
        header.push_str(&format!("Source: {}\n", url));
    }

    header
}

fn is_block(el: ElementRef<'_>) -> bool {
    BLOCK_ELEMENTS.contains(&el.value().name())
}

/// Texts of the innermost block elements, in document order.
///
/// Falls back to the root's whole text when it holds no blocks.
fn block_texts(root: ElementRef<'_>) -> Vec<String> {
    let blocks: Vec<String> = root
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| is_block(*el) && !el.descendants().skip(1).filter_map(ElementRef::wrap).any(is_block))
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect();

    if blocks.is_empty() {
        let text = collapse_whitespace(&root.text().collect::<String>());
        if text.is_empty() { Vec::new() } else { vec![text] }
    } else {
        blocks
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap a single paragraph to specified line width
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line.push_str(word);
        } else if current_line.chars().count() + 1 + word.chars().count() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Strategy;
    use crate::fragment::ContentFragment;
    use crate::parse::Document;
    use crate::result::sample_result;

    fn result_from(html: &str) -> ExtractionResult {
        let doc = Document::parse(&format!("<html><body><article>{}</article></body></html>", html)).unwrap();
        let article = doc.select_first("article").unwrap().unwrap();
        ExtractionResult {
            title: "Test Title".to_string(),
            content: ContentFragment::from_element(&article),
            source_url: None,
            strategy: Strategy::ConfiguredSelectors,
        }
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let result = result_from(
            r#"
            <p>First paragraph.</p>
            <p>Second   paragraph
               continues.</p>
            <div><p>Nested paragraph.</p></div>
        "#,
        );

        let text = convert_to_text(&result, &TextConfig::default()).unwrap();
        assert_eq!(text, "First paragraph.\n\nSecond paragraph continues.\n\nNested paragraph.");
    }

    #[test]
    fn test_lists_and_quotes() {
        let result = result_from(
            r#"<ul><li>First item</li><li>Second item</li></ul><blockquote>This is a quoted text.</blockquote>"#,
        );

        let text = convert_to_text(&result, &TextConfig::default()).unwrap();
        assert_eq!(text, "First item\n\nSecond item\n\nThis is a quoted text.");
    }

    #[test]
    fn test_flat_text() {
        let result = result_from("<p>One.</p><p>Two.</p>");
        let config = TextConfig { preserve_paragraphs: false, ..Default::default() };

        assert_eq!(convert_to_text(&result, &config).unwrap(), "One.Two.");
    }

    #[test]
    fn test_inline_only_content() {
        let result = result_from("Loose <em>inline</em> text");
        assert_eq!(convert_to_text(&result, &TextConfig::default()).unwrap(), "Loose inline text");
    }

    #[test]
    fn test_header() {
        let config = TextConfig { include_header: true, ..Default::default() };
        let text = TextFormatter::new(config).convert(&sample_result()).unwrap();

        assert!(text.starts_with("Sample <Title>\n==============\nSource: https://example.com/post?a=1&b=2"));
        assert!(text.ends_with("It's a well-known fact that tests help."));
    }

    #[test]
    fn test_header_without_url() {
        let config = TextConfig { include_header: true, ..Default::default() };
        let text = convert_to_text(&result_from("<p>Content here.</p>"), &config).unwrap();

        assert!(text.starts_with("Test Title\n=========="));
        assert!(!text.contains("Source:"));
    }

    #[test]
    fn test_wrap_text() {
        let wrapped = wrap_text("This is a long line that should be wrapped at a smaller width", 20);
        assert!(wrapped.lines().all(|line| line.chars().count() <= 20));
        assert!(wrapped.contains('\n'));

        assert_eq!(wrap_text("This is a line", 0), "This is a line");
    }

    #[test]
    fn test_line_width_keeps_paragraph_breaks() {
        let result = result_from("<p>alpha beta gamma delta</p><p>epsilon</p>");
        let config = TextConfig { line_width: 11, ..Default::default() };

        assert_eq!(convert_to_text(&result, &config).unwrap(), "alpha beta\ngamma delta\n\nepsilon");
    }
}
