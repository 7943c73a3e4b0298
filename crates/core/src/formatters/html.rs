use crate::fragment::escape_text;
use crate::result::ExtractionResult;

/// Default stylesheet for the reading view.
const READING_VIEW_CSS: &str = r#"
#reading-mode-overlay { max-width: 42rem; margin: 0 auto; padding: 2rem 1.25rem; font: 1.125rem/1.7 Georgia, serif; color: #222; background: #fdfdf8; }
.reading-mode-header { border-bottom: 1px solid #ddd; margin-bottom: 2rem; padding-bottom: 1rem; }
.reading-mode-title { font-size: 2rem; line-height: 1.25; margin: 0 0 0.5rem; }
.reading-mode-url { font: 0.875rem/1.4 system-ui, sans-serif; color: #666; word-break: break-all; }
.reading-mode-close { float: right; border: 0; background: none; font-size: 1.5rem; cursor: pointer; }
.reading-mode-content img, .reading-mode-content video { max-width: 100%; height: auto; }
.reading-mode-content pre { overflow-x: auto; }
"#;

/// Configuration for the reading-view HTML
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Wrap the overlay in a full `<html>` document
    pub standalone: bool,
    /// Embed the default stylesheet (standalone documents only)
    pub include_styles: bool,
    /// Render the close button in the header
    pub include_close_button: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self { standalone: true, include_styles: true, include_close_button: false }
    }
}

/// Renders `result` as the reading-view overlay.
///
/// The title and source URL are escaped; the content is already sanitized
/// markup and is inserted as is.
pub fn render_reading_view(result: &ExtractionResult, config: &HtmlConfig) -> String {
    let title = escape_text(&result.title);
    let mut overlay = String::from("<div id=\"reading-mode-overlay\">\n<div class=\"reading-mode-header\">\n");

    if config.include_close_button {
        overlay.push_str(
            "<button class=\"reading-mode-close\" title=\"Exit Reading Mode (press 'aa' again)\">\u{00d7}</button>\n",
        );
    }
    overlay.push_str(&format!("<h1 class=\"reading-mode-title\">{}</h1>\n", title));
    if let Some(url) = &result.source_url {
        overlay.push_str(&format!("<div class=\"reading-mode-url\">{}</div>\n", escape_text(url)));
    }
    overlay.push_str("</div>\n<div class=\"reading-mode-content\">\n");
    overlay.push_str(&result.content_html());
    overlay.push_str("\n</div>\n</div>");

    if !config.standalone {
        return overlay;
    }

    let style = if config.include_styles { format!("<style>{}</style>\n", READING_VIEW_CSS) } else { String::new() };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{}</title>\n{}</head>\n<body>\n{}\n</body>\n</html>\n",
        title, style, overlay
    )
}

/// Reading-view formatter with configurable options
pub struct HtmlFormatter {
    config: HtmlConfig,
}

impl HtmlFormatter {
    pub fn new(config: HtmlConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, result: &ExtractionResult) -> String {
        render_reading_view(result, &self.config)
    }
}
