//! Cleanup of extracted content.
//!
//! The sanitizer runs six ordered passes over a [`ContentFragment`]:
//!
//! 1. site-specific removal selectors
//! 2. the base block list (scripts, page chrome, ads, social widgets, overlays)
//! 3. comment and related-content blocks, unless the site preserves comments
//! 4. a heuristic sweep over class/id names and text
//! 5. attribute stripping down to an allow-list
//! 6. pruning of empty elements
//!
//! Fragments are detached copies, so the page the content came from is
//! never touched.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

use crate::fragment::ContentFragment;
use crate::siteconfig::SiteConfig;

/// Selectors removed from every page.
pub const BASE_REMOVE_SELECTORS: &[&str] = &[
    // scripts and styles
    "script",
    "style",
    "noscript",
    "link[rel=\"stylesheet\"]",
    // page chrome
    "nav",
    "header",
    "footer",
    ".navbar",
    ".navigation",
    ".nav",
    ".menu",
    ".breadcrumb",
    ".breadcrumbs",
    // sidebars
    ".sidebar",
    ".side-bar",
    ".widget",
    ".widgets",
    "[class*=\"sidebar\"]",
    "[id*=\"sidebar\"]",
    ".column-sidebar",
    ".secondary",
    // ads
    ".ad",
    ".ads",
    ".advertisement",
    ".advert",
    ".adsystem",
    ".ad-banner",
    "[class*=\"ad-\"]",
    "[id*=\"ad-\"]",
    "[class*=\"ads-\"]",
    "[id*=\"ads-\"]",
    "[class*=\"advert\"]",
    "[id*=\"advert\"]",
    ".google-ad",
    ".adsense",
    ".banner",
    ".promo",
    ".promotion",
    ".sponsored",
    ".sponsor",
    // social
    ".social-share",
    ".share-buttons",
    ".social-buttons",
    ".sharing",
    ".social-media",
    ".share-box",
    ".share-tools",
    ".social-icons",
    ".follow-us",
    ".subscribe",
    ".newsletter",
    // overlays
    ".popup",
    ".modal",
    ".overlay",
    ".toast",
    ".notification",
    ".alert",
    ".banner-top",
    ".banner-bottom",
    "[class*=\"widget\"]",
    "[class*=\"banner\"]",
    "[class*=\"promo\"]",
    "[class*=\"sponsor\"]",
    "[class*=\"track\"]",
    "[class*=\"analytics\"]",
];

/// Selectors removed only when comments are not preserved.
pub const ARTICLE_REMOVE_SELECTORS: &[&str] = &[
    ".comments",
    ".comment-form",
    ".comment-section",
    ".discuss",
    ".disqus",
    ".livefyre",
    ".facebook-comments",
    ".related-posts",
    ".related-articles",
    ".recommendations",
    ".more-stories",
    ".you-may-like",
    ".suggested",
    ".similar",
    ".next-post",
    ".prev-post",
    ".post-navigation",
    "[class*=\"comment\"]",
    "[class*=\"related\"]",
    "[class*=\"recommend\"]",
    "[class*=\"social\"]",
    "[class*=\"share\"]",
];

/// Attributes kept by the stripping pass.
pub const DEFAULT_ALLOWED_ATTRIBUTES: &[&str] = &["href", "src", "alt", "title", "colspan", "rowspan", "data-testid"];

/// Tags kept even with no children at all.
const KEEP_EMPTY: &[&str] =
    &["img", "br", "hr", "input", "textarea", "video", "audio", "source", "track", "embed", "iframe"];

/// Tags kept even when they hold only whitespace.
const KEEP_BLANK: &[&str] = &["img", "br", "hr", "input", "textarea", "video", "audio"];

/// Minimum trimmed text length for a leaf `div` to count as content.
const MIN_LEAF_DIV_CHARS: usize = 50;

const SUSPICIOUS_PATTERNS: &str =
    r"(?i)(ad|ads|advert|sponsor|promo|banner|popup|modal|subscribe|newsletter|sidebar|widget)";
const ARTICLE_SUSPICIOUS_PATTERNS: &str = r"(?i)(social|share|comment|related|recommend)";
const NON_CONTENT_TEXT: &str = r"(?i)(advertisement|sponsored)";
const ARTICLE_NON_CONTENT_TEXT: &str = r"(?i)(related articles|you may also like|more stories)";

static SUSPICIOUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(SUSPICIOUS_PATTERNS).expect("valid pattern"));
static ARTICLE_SUSPICIOUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ARTICLE_SUSPICIOUS_PATTERNS).expect("valid pattern"));
static NON_CONTENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(NON_CONTENT_TEXT).expect("valid pattern"));
static ARTICLE_NON_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ARTICLE_NON_CONTENT_TEXT).expect("valid pattern"));

/// Configuration for the sanitizer
#[derive(Debug, Clone)]
pub struct SanitizeConfig {
    /// Attribute names that survive stripping (case-insensitive)
    pub allowed_attributes: Vec<String>,
    /// Maximum number of `:empty` pruning passes
    pub max_empty_passes: usize,
    /// Whether to strip attributes at all
    pub strip_attributes: bool,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            allowed_attributes: DEFAULT_ALLOWED_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            max_empty_passes: 3,
            strip_attributes: true,
        }
    }
}

/// Removal counts per pass, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeStats {
    pub site_removed: usize,
    pub base_removed: usize,
    pub article_removed: usize,
    pub heuristic_removed: usize,
    pub empty_removed: usize,
}

/// Multi-pass content cleaner.
#[derive(Debug, Clone, Default)]
pub struct ContentSanitizer {
    config: SanitizeConfig,
}

impl ContentSanitizer {
    pub fn new(config: SanitizeConfig) -> Self {
        Self { config }
    }

    /// Cleans `fragment` according to `site`.
    pub fn sanitize(&self, fragment: ContentFragment, site: &SiteConfig) -> ContentFragment {
        self.sanitize_with_stats(fragment, site).0
    }

    /// Cleans `fragment` and reports how much each pass removed.
    pub fn sanitize_with_stats(&self, mut fragment: ContentFragment, site: &SiteConfig) -> (ContentFragment, SanitizeStats) {
        let mut stats = SanitizeStats::default();
        let preserve = site.preserve_comments;

        stats.site_removed = remove_all(&mut fragment, site.remove_selectors.iter().map(String::as_str), true);
        stats.base_removed = remove_all(&mut fragment, BASE_REMOVE_SELECTORS.iter().copied(), false);
        if !preserve {
            stats.article_removed = remove_all(&mut fragment, ARTICLE_REMOVE_SELECTORS.iter().copied(), false);
        }
        stats.heuristic_removed = sweep(&mut fragment, preserve);
        if self.config.strip_attributes {
            self.strip_attributes(&mut fragment);
        }
        stats.empty_removed = self.prune_empty(&mut fragment);

        tracing::debug!(
            site = stats.site_removed,
            base = stats.base_removed,
            article = stats.article_removed,
            heuristic = stats.heuristic_removed,
            empty = stats.empty_removed,
            remaining = fragment.element_count(),
            "sanitized content"
        );

        (fragment, stats)
    }

    fn strip_attributes(&self, fragment: &mut ContentFragment) {
        for id in fragment.element_ids() {
            fragment.retain_attributes(id, &self.config.allowed_attributes);
        }
    }

    /// Removes `:empty` elements for up to `max_empty_passes` passes, then
    /// childless elements holding only whitespace.
    fn prune_empty(&self, fragment: &mut ContentFragment) -> usize {
        let mut removed = 0;

        for _ in 0..self.config.max_empty_passes {
            let empty: Vec<_> = fragment
                .descendant_ids()
                .into_iter()
                .filter(|id| fragment.element(*id).is_some_and(|el| is_empty(el) && !has_tag(el, KEEP_EMPTY)))
                .collect();
            if empty.is_empty() {
                break;
            }
            removed += empty.len();
            for id in empty {
                fragment.remove(id);
            }
        }

        for id in fragment.descendant_ids() {
            let blank = fragment.contains(id)
                && fragment.element(id).is_some_and(|el| is_blank(el) && !has_tag(el, KEEP_BLANK));
            if blank {
                fragment.remove(id);
                removed += 1;
            }
        }

        removed
    }
}

/// Sanitizes with the default [`SanitizeConfig`].
pub fn sanitize(fragment: ContentFragment, site: &SiteConfig) -> ContentFragment {
    ContentSanitizer::default().sanitize(fragment, site)
}

fn remove_all<'s>(fragment: &mut ContentFragment, selectors: impl Iterator<Item = &'s str>, from_config: bool) -> usize {
    let mut removed = 0;
    for selector in selectors {
        match fragment.remove_matching(selector) {
            Ok(count) => removed += count,
            Err(e) if from_config => tracing::warn!(error = %e, "skipping removal selector"),
            Err(e) => tracing::debug!(error = %e, "skipping removal selector"),
        }
    }
    removed
}

/// Single pass over a snapshot of the elements below the root.
fn sweep(fragment: &mut ContentFragment, preserve_comments: bool) -> usize {
    let mut removed = 0;
    for id in fragment.descendant_ids() {
        let flagged = fragment.contains(id)
            && fragment
                .element(id)
                .is_some_and(|el| is_suspicious(el, preserve_comments) || is_non_content(el, preserve_comments));
        if flagged {
            fragment.remove(id);
            removed += 1;
        }
    }
    removed
}

fn is_suspicious(el: ElementRef<'_>, preserve_comments: bool) -> bool {
    [el.value().attr("class"), el.value().attr("id")].into_iter().flatten().any(|name| {
        SUSPICIOUS.is_match(name) || (!preserve_comments && ARTICLE_SUSPICIOUS.is_match(name))
    })
}

fn is_non_content(el: ElementRef<'_>, preserve_comments: bool) -> bool {
    let text: String = el.text().collect();
    if NON_CONTENT.is_match(&text) || (!preserve_comments && ARTICLE_NON_CONTENT.is_match(&text)) {
        return true;
    }
    el.value().name().eq_ignore_ascii_case("div")
        && !has_element_children(el)
        && text.trim().chars().count() < MIN_LEAF_DIV_CHARS
}

fn has_element_children(el: ElementRef<'_>) -> bool {
    el.children().any(|child| child.value().is_element())
}

/// No element or text children, like CSS `:empty`.
fn is_empty(el: ElementRef<'_>) -> bool {
    !el.children().any(|child| child.value().is_element() || child.value().is_text())
}

fn is_blank(el: ElementRef<'_>) -> bool {
    !has_element_children(el) && el.text().all(|t| t.trim().is_empty())
}

fn has_tag(el: ElementRef<'_>, tags: &[&str]) -> bool {
    let name = el.value().name();
    tags.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}
