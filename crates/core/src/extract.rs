use crate::fragment::ContentFragment;
use crate::parse::Document;
use crate::result::ExtractionResult;
use crate::sanitize::{ContentSanitizer, SanitizeConfig};
use crate::siteconfig::{SiteConfig, SiteConfigRegistry};
use crate::title::resolve_title;
use crate::{ReadModeError, Result};

use serde::Serialize;
use std::fmt;

/// Configuration for the text-sufficiency check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Trimmed text must be strictly longer than this many characters
    pub min_text_length: usize,
    /// Text must hold strictly more than this many words
    pub min_word_count: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { min_text_length: 300, min_word_count: 50 }
    }
}

impl ExtractConfig {
    /// Whether `text` is long enough to be the main content of a page.
    ///
    /// Words are whitespace-delimited non-empty tokens.
    pub fn has_enough_text(&self, text: &str) -> bool {
        let text = text.trim();
        if text.chars().count() <= self.min_text_length {
            return false;
        }
        text.split_whitespace().count() > self.min_word_count
    }
}

/// Text-sufficiency check with the default thresholds (300 chars, 50 words).
pub fn has_enough_text(text: &str) -> bool {
    ExtractConfig::default().has_enough_text(text)
}

/// A step of the extraction cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The site's named custom extractor
    CustomExtractor,
    /// The site's main selectors, in order
    ConfiguredSelectors,
    /// The whole `<body>`
    BodyFallback,
}

impl Strategy {
    /// All strategies in the order they are tried.
    pub const CASCADE: [Strategy; 3] = [Strategy::CustomExtractor, Strategy::ConfiguredSelectors, Strategy::BodyFallback];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::CustomExtractor => "custom_extractor",
            Strategy::ConfiguredSelectors => "configured_selectors",
            Strategy::BodyFallback => "body_fallback",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finds, copies and cleans the main content of a page.
///
/// The page is never modified: the winning candidate is deep-cloned into a
/// [`ContentFragment`] before the sanitizer sees it.
#[derive(Debug, Clone, Default)]
pub struct ContentLocator {
    config: ExtractConfig,
    sanitizer: ContentSanitizer,
}

impl ContentLocator {
    pub fn new(config: ExtractConfig, sanitize: SanitizeConfig) -> Self {
        Self { config, sanitizer: ContentSanitizer::new(sanitize) }
    }

    /// Gets the text thresholds.
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Runs the cascade for `doc` under `site` and cleans the result.
    ///
    /// Returns `None` when no strategy finds enough text; the caller should
    /// leave the page as it is.
    pub fn locate(&self, doc: &Document, site: &SiteConfig) -> Option<ExtractionResult> {
        let Some((strategy, fragment)) = self.find_candidate(doc, site) else {
            tracing::debug!(url = ?doc.url().map(|u| u.as_str()), "no readable content found");
            return None;
        };

        let content = self.sanitizer.sanitize(fragment, site);
        let title = resolve_title(doc);
        tracing::info!(%strategy, title = %title, "extracted content");

        Some(ExtractionResult { title, content, source_url: doc.url().map(|u| u.to_string()), strategy })
    }

    /// Resolves the site configuration for `doc` and locates its content.
    ///
    /// Documents without a URL use the registry's default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::NoContent`] when no strategy succeeds.
    pub fn extract(&self, doc: &Document, registry: &SiteConfigRegistry) -> Result<ExtractionResult> {
        let site = match doc.hostname() {
            Some(hostname) => registry.resolve(hostname),
            None => registry.default_config(),
        };
        self.locate(doc, site).ok_or(ReadModeError::NoContent)
    }

    /// First strategy whose candidate passes the text check, with the
    /// uncleaned candidate.
    pub fn find_candidate(&self, doc: &Document, site: &SiteConfig) -> Option<(Strategy, ContentFragment)> {
        Strategy::CASCADE
            .into_iter()
            .find_map(|strategy| self.try_strategy(strategy, doc, site).map(|fragment| (strategy, fragment)))
    }

    fn try_strategy(&self, strategy: Strategy, doc: &Document, site: &SiteConfig) -> Option<ContentFragment> {
        match strategy {
            Strategy::CustomExtractor => self.custom_extractor(doc, site),
            Strategy::ConfiguredSelectors => self.configured_selectors(doc, site),
            Strategy::BodyFallback => self.body_fallback(doc),
        }
    }

    fn custom_extractor(&self, doc: &Document, site: &SiteConfig) -> Option<ContentFragment> {
        let extractor = site.extractor?;
        match extractor.extract(doc, site) {
            Ok(Some(fragment)) if self.config.has_enough_text(&fragment.text()) => {
                tracing::debug!(%extractor, "custom extractor matched");
                Some(fragment)
            }
            Ok(_) => {
                tracing::debug!(%extractor, "custom extractor found too little text");
                None
            }
            Err(e) => {
                tracing::warn!(%extractor, error = %e, "custom extractor failed");
                None
            }
        }
    }

    /// Only the first element matching each selector group is considered.
    fn configured_selectors(&self, doc: &Document, site: &SiteConfig) -> Option<ContentFragment> {
        for selector in &site.main_selectors {
            match doc.select_first(selector) {
                Ok(Some(element)) if self.config.has_enough_text(&element.text()) => {
                    tracing::debug!(selector = %selector, "configured selector matched");
                    return Some(ContentFragment::from_element(&element));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping main selector"),
            }
        }
        None
    }

    fn body_fallback(&self, doc: &Document) -> Option<ContentFragment> {
        let body = doc.body()?;
        if self.config.has_enough_text(&body.text()) {
            tracing::debug!("using body fallback");
            Some(ContentFragment::from_element(&body))
        } else {
            None
        }
    }
}

/// Locates content with default thresholds.
pub fn locate(doc: &Document, site: &SiteConfig) -> Option<ExtractionResult> {
    ContentLocator::default().locate(doc, site)
}

/// Extracts content with default thresholds, resolving the site through
/// `registry`.
///
/// # Errors
///
/// Returns [`ReadModeError::NoContent`] when no strategy succeeds.
pub fn extract(doc: &Document, registry: &SiteConfigRegistry) -> Result<ExtractionResult> {
    ContentLocator::default().extract(doc, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ExtractorKind;
    use rstest::rstest;

    fn words(n: usize) -> String {
        let vocab = ["lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "elit", "tempor"];
        (0..n).map(|i| vocab[i % vocab.len()]).collect::<Vec<_>>().join(" ")
    }

    #[rstest]
    #[case(&"x".repeat(400), false)]
    #[case(&"abcdef ".repeat(50), false)]
    #[case(&"abcdef ".repeat(51), true)]
    #[case(&"ab ".repeat(100), false)]
    #[case(&"abc ".repeat(100), true)]
    #[case("", false)]
    fn test_has_enough_text(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(has_enough_text(text), expected);
    }

    #[test]
    fn test_has_enough_text_rejects_below_either_threshold() {
        let config = ExtractConfig::default();
        for n in [0, 10, 40, 50] {
            assert!(!config.has_enough_text(&"longword ".repeat(n)));
        }
        let padded = format!("   {}   ", words(30));
        assert!(!config.has_enough_text(&padded));
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ExtractConfig { min_text_length: 10, min_word_count: 2 };
        assert!(config.has_enough_text("three short words"));
        assert!(!config.has_enough_text("two words"));
    }

    #[test]
    fn test_medium_body_fallback() {
        let html = format!("<html><head><title>Story</title></head><body><p>{}</p></body></html>", words(100));
        let doc = Document::parse_with_url(&html, "https://medium.com/@someone/story").unwrap();
        let registry = SiteConfigRegistry::builtin();

        let result = extract(&doc, &registry).unwrap();

        assert_eq!(result.strategy, Strategy::BodyFallback);
        assert_eq!(result.content.root_tag(), "body");
        assert_eq!(result.source_url.as_deref(), Some("https://medium.com/@someone/story"));
        assert!(result.content.text().contains("lorem ipsum"));
    }

    #[test]
    fn test_configured_selectors_in_order() {
        let html = format!(
            r#"<html><body>
                <div class="entry-content"><p>Too short.</p></div>
                <section class="story"><p>{}</p></section>
            </body></html>"#,
            words(80)
        );
        let doc = Document::parse(&html).unwrap();
        let site = SiteConfig::article(&[".entry-content", "[[broken", ".story"]);

        let (strategy, fragment) = ContentLocator::default().find_candidate(&doc, &site).unwrap();

        assert_eq!(strategy, Strategy::ConfiguredSelectors);
        assert_eq!(fragment.root_tag(), "section");
    }

    #[test]
    fn test_selector_group_only_checks_first_match() {
        let html = format!(
            r#"<html><body>
                <p class="post">Short teaser.</p>
                <p class="post">{}</p>
            </body></html>"#,
            words(80)
        );
        let doc = Document::parse(&html).unwrap();
        let site = SiteConfig::article(&[".post"]);

        let (strategy, fragment) = ContentLocator::default().find_candidate(&doc, &site).unwrap();

        assert_eq!(strategy, Strategy::BodyFallback);
        assert_eq!(fragment.root_tag(), "body");
    }

    #[test]
    fn test_custom_extractor_wins() {
        let html = format!(
            r#"<html><head><title>Thread - reddit</title></head><body>
                <div data-testid="post-content"><h1>Thread title here</h1><p>{}</p></div>
                <div class="comments-area"><div data-testid="comment"><p>{}</p></div></div>
            </body></html>"#,
            words(40),
            words(30)
        );
        let doc = Document::parse_with_url(&html, "https://www.reddit.com/r/rust/comments/1").unwrap();

        let result = extract(&doc, &SiteConfigRegistry::builtin()).unwrap();

        assert_eq!(result.strategy, Strategy::CustomExtractor);
        assert_eq!(result.title, "Thread title here");
        assert!(result.content.inner_html().contains("<h2>Comments</h2>"));
    }

    #[test]
    fn test_failing_extractor_falls_through() {
        let html = format!("<html><body><article><p>{}</p></article></body></html>", words(80));
        let doc = Document::parse(&html).unwrap();
        let site = SiteConfig::article(&["[[broken", "article"]).with_extractor(ExtractorKind::Reddit);

        let result = locate(&doc, &site).unwrap();
        assert_eq!(result.strategy, Strategy::ConfiguredSelectors);
        assert_eq!(result.content.root_tag(), "article");
    }

    #[test]
    fn test_no_content() {
        let doc = Document::parse("<html><body><p>Just a few words.</p></body></html>").unwrap();
        let registry = SiteConfigRegistry::builtin();

        assert!(locate(&doc, registry.default_config()).is_none());
        assert!(matches!(extract(&doc, &registry), Err(ReadModeError::NoContent)));
    }

    #[test]
    fn test_locate_leaves_document_untouched() {
        let html = format!(
            r#"<html><body><article class="post" data-id="7"><p>{}</p><nav>Menu</nav></article></body></html>"#,
            words(80)
        );
        let doc = Document::parse(&html).unwrap();
        let before = doc.as_string();

        let result = locate(&doc, &SiteConfig::article(&["article"])).unwrap();

        assert!(!result.content.text().contains("Menu"));
        assert_eq!(doc.as_string(), before);
    }

    #[test]
    fn test_source_url_absent_without_url() {
        let html = format!("<html><body><article><p>{}</p></article></body></html>", words(80));
        let doc = Document::parse(&html).unwrap();

        let result = extract(&doc, &SiteConfigRegistry::builtin()).unwrap();
        assert!(result.source_url.is_none());
        assert_eq!(result.strategy, Strategy::ConfiguredSelectors);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::BodyFallback.to_string(), "body_fallback");
        assert_eq!(serde_json::to_string(&Strategy::CustomExtractor).unwrap(), "\"custom_extractor\"");
    }
}
