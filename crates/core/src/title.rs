//! Article title resolution.
//!
//! Headline candidates are tried first; the document `<title>` is the
//! fallback, with a trailing site name split off when possible.

use crate::parse::{Document, Element};

/// Title candidates in priority order. Only the first match of each is
/// examined.
pub const TITLE_SELECTORS: &[&str] = &[
    "h1",
    ".post-title",
    ".entry-title",
    ".article-title",
    ".title",
    "#title",
    "meta[property=\"og:title\"]",
    "[data-testid=\"tweet\"] [data-testid=\"tweetText\"]",
    ".QuestionText",
    ".q-text",
];

/// Separators between an article title and a site name in `<title>`.
pub const TITLE_SEPARATORS: &[&str] = &[" - ", " | ", " :: ", " \u{2014} ", " \u{2013} ", " / "];

const MIN_TITLE_CHARS: usize = 5;
const MAX_TITLE_CHARS: usize = 200;

/// Resolves the title of `doc`. Never fails; returns an empty string for
/// a page with no candidates and no `<title>`.
///
/// # Example
///
/// ```rust
/// use readmode_core::{Document, resolve_title};
///
/// let doc = Document::parse("<html><head><title>Fallback</title></head><body><h1>A Proper Headline</h1></body></html>").unwrap();
/// assert_eq!(resolve_title(&doc), "A Proper Headline");
/// ```
pub fn resolve_title(doc: &Document) -> String {
    for selector in TITLE_SELECTORS {
        let element = match doc.select_first(selector) {
            Ok(Some(element)) => element,
            Ok(None) => continue,
            Err(e) => {
                tracing::debug!(error = %e, "skipping title selector");
                continue;
            }
        };

        let candidate = candidate_text(&element);
        if is_acceptable(&candidate) {
            tracing::debug!(selector, "resolved title from selector");
            return candidate;
        }
    }

    let doc_title = doc.title().unwrap_or_default();
    split_site_name(&doc_title).unwrap_or(doc_title)
}

fn candidate_text(element: &Element<'_>) -> String {
    if element.tag_name() == "meta" {
        element.attr("content").unwrap_or_default().trim().to_string()
    } else {
        element.text().trim().to_string()
    }
}

fn is_acceptable(title: &str) -> bool {
    let len = title.chars().count();
    len > MIN_TITLE_CHARS && len < MAX_TITLE_CHARS
}

/// Left segment of `title` at the first separator whose left segment is
/// long enough to be a title on its own.
fn split_site_name(title: &str) -> Option<String> {
    TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.split_once(sep).map(|(left, _)| left))
        .find(|left| left.chars().count() > MIN_TITLE_CHARS)
        .map(|left| left.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn page(head: &str, body: &str) -> Document {
        Document::parse(&format!("<html><head>{}</head><body>{}</body></html>", head, body)).unwrap()
    }

    #[test]
    fn test_h1_wins() {
        let doc = page("<title>Doc Title - Site</title>", "<h1>  Headline Here  </h1><div class=\"title\">Other title</div>");
        assert_eq!(resolve_title(&doc), "Headline Here");
    }

    #[test]
    fn test_only_first_match_is_examined() {
        let doc = page("<title>Doc Title Long - Site</title>", "<h1>Hi</h1><h1>A Second Headline</h1>");
        assert_eq!(resolve_title(&doc), "Doc Title Long");
    }

    #[test]
    fn test_meta_og_title() {
        let doc = page(r#"<meta property="og:title" content="Open Graph Title"><title>x</title>"#, "<p>body</p>");
        assert_eq!(resolve_title(&doc), "Open Graph Title");
    }

    #[test]
    fn test_og_title_is_trimmed_before_length_check() {
        let doc = page(r#"<meta property="og:title" content="   Hey    "><title>Readable Article | Example</title>"#, "");
        assert_eq!(resolve_title(&doc), "Readable Article");

        let doc = page(r#"<meta property="og:title" content="  Padded Title  ">"#, "");
        assert_eq!(resolve_title(&doc), "Padded Title");
    }

    #[test]
    fn test_short_og_title_falls_through_to_split() {
        let doc = page(r#"<meta property="og:title" content="Hi"><title>Readable Article | Example News</title>"#, "");
        assert_eq!(resolve_title(&doc), "Readable Article");
    }

    #[test]
    fn test_too_long_candidate_rejected() {
        let long = "word ".repeat(50);
        let doc = page("<title>Fallback Title</title>", &format!("<h1>{}</h1>", long));
        assert_eq!(resolve_title(&doc), "Fallback Title");
    }

    #[test]
    fn test_tweet_text() {
        let doc = page(
            "<title>X</title>",
            r#"<article data-testid="tweet"><div data-testid="tweetText">Just shipped a release</div></article>"#,
        );
        assert_eq!(resolve_title(&doc), "Just shipped a release");
    }

    #[rstest]
    #[case("Long Enough Title - Site", "Long Enough Title")]
    #[case("Long Enough Title | Site | Section", "Long Enough Title")]
    #[case("Forum Thread :: Board", "Forum Thread")]
    #[case("Essay Title \u{2014} Author", "Essay Title")]
    #[case("Essay Title \u{2013} Author", "Essay Title")]
    #[case("Category Page / Site", "Category Page")]
    #[case("Short - Site Name", "Short - Site Name")]
    #[case("No separators here", "No separators here")]
    #[case("", "")]
    fn test_document_title_fallback(#[case] title: &str, #[case] expected: &str) {
        let doc = page(&format!("<title>{}</title>", title), "");
        assert_eq!(resolve_title(&doc), expected);
    }

    #[test]
    fn test_separator_priority() {
        // " - " is tried before " | " regardless of position.
        let doc = page("<title>Tiny | Section - Site</title>", "");
        assert_eq!(resolve_title(&doc), "Tiny | Section");

        // A short left segment moves on to the next separator.
        let doc = page("<title>Tiny - Longer Part | Site</title>", "");
        assert_eq!(resolve_title(&doc), "Tiny - Longer Part");
    }

    #[test]
    fn test_missing_title() {
        let doc = page("", "<p>No headings</p>");
        assert_eq!(resolve_title(&doc), "");
    }
}
