//! Hostname to [`SiteConfig`] resolution.
//!
//! The registry holds an ordered list of hostname patterns plus a default
//! configuration. Resolution never fails: an exact match wins, then the
//! first registered pattern contained in the hostname, then the default.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::SiteConfigRegistry;
//!
//! let registry = SiteConfigRegistry::builtin();
//! let reddit = registry.resolve("old.reddit.com");
//! assert!(reddit.preserve_comments);
//! assert_eq!(reddit, registry.resolve("www.reddit.com"));
//! ```

use crate::extractors::ExtractorKind;
use crate::siteconfig::directives::SiteConfig;

/// Main selectors used when no site-specific configuration matches.
pub const DEFAULT_MAIN_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    "main",
    ".post-content",
    ".entry-content",
    ".content",
    "#content",
    ".article-content",
    ".post-body",
    ".post",
    ".entry",
    ".story",
    ".article",
    ".blog-post",
];

const TWEET_MAIN: &str = "[data-testid=\"tweetText\"], [data-testid=\"tweet\"]";
const TWEET_COMMENTS: &str = "[data-testid=\"reply\"], [data-testid=\"tweetText\"]";
const TWEET_CONTAINER: &str = "[aria-label*=\"replies\"], [data-testid=\"primaryColumn\"]";

/// Ordered hostname pattern registry.
#[derive(Debug, Clone)]
pub struct SiteConfigRegistry {
    entries: Vec<(String, SiteConfig)>,
    default: SiteConfig,
}

impl SiteConfigRegistry {
    /// Creates an empty registry that resolves everything to `default`.
    pub fn new(default: SiteConfig) -> Self {
        Self { entries: Vec::new(), default }
    }

    /// Creates a registry with the built-in site table.
    pub fn builtin() -> Self {
        let mut registry = Self::new(SiteConfig::article(DEFAULT_MAIN_SELECTORS));

        registry.register(
            "reddit.com",
            SiteConfig::discussion(&["[data-testid=\"post-content\"], .Post, [class*=\"Post\"]"])
                .with_comments(
                    "[data-testid=\"comment\"], .Comment, [class*=\"Comment\"]",
                    Some("[class*=\"comments\"], [data-testid=\"comments-page-link-num-comments\"]"),
                )
                .with_extractor(ExtractorKind::Reddit),
        );
        registry.register(
            "twitter.com",
            SiteConfig::discussion(&[TWEET_MAIN])
                .with_comments(TWEET_COMMENTS, Some(TWEET_CONTAINER))
                .with_extractor(ExtractorKind::Twitter),
        );
        registry.register(
            "x.com",
            SiteConfig::discussion(&[TWEET_MAIN])
                .with_comments(TWEET_COMMENTS, Some(TWEET_CONTAINER))
                .with_extractor(ExtractorKind::Twitter),
        );
        registry.register(
            "news.ycombinator.com",
            SiteConfig::discussion(&[".fatitem, .athing"])
                .with_comments(".comment-tree, .commtext", None)
                .with_extractor(ExtractorKind::HackerNews),
        );
        registry.register(
            "stackoverflow.com",
            SiteConfig::discussion(&[".question, #question"]).with_comments(".answer, .comments", None),
        );
        registry.register(
            "quora.com",
            SiteConfig::discussion(&[".q-text, .QuestionText"]).with_comments(".Answer, .AnswerBase", None),
        );

        registry.register(
            "36kr.com",
            SiteConfig::article(&[".article-detail-bd, .article-content, .kr-content"]).with_remove_selectors(&[
                ".kr-aside",
                ".kr-nav",
                ".article-actions",
                ".share-box",
            ]),
        );
        registry.register(
            "paulgraham.com",
            SiteConfig::article(&["body"])
                .with_remove_selectors(&["img[src*=\"arc.png\"]", "img[width=\"12\"]"])
                .with_extractor(ExtractorKind::PaulGraham),
        );
        registry.register(
            "medium.com",
            SiteConfig::article(&["article, .postArticle-content, [data-testid=\"post-content\"]"]),
        );
        registry.register("substack.com", SiteConfig::article(&[".post-content, .markup, article"]));
        registry.register(
            "techcrunch.com",
            SiteConfig::article(&[".article-content, .post-content, .entry-content"]),
        );
        registry.register("arstechnica.com", SiteConfig::article(&[".post-content, .article-content"]));
        registry.register("theverge.com", SiteConfig::article(&[".c-entry-content, .article-content"]));

        registry
    }

    /// Registers `config` under `pattern`.
    ///
    /// An existing pattern keeps its position and has its configuration
    /// replaced; a new pattern is appended.
    pub fn register(&mut self, pattern: &str, config: SiteConfig) {
        let pattern = normalize_hostname(pattern);
        match self.entries.iter_mut().find(|(key, _)| *key == pattern) {
            Some(entry) => entry.1 = config,
            None => self.entries.push((pattern, config)),
        }
    }

    /// Replaces the fallback configuration.
    pub fn set_default(&mut self, config: SiteConfig) {
        self.default = config;
    }

    /// Gets the fallback configuration.
    pub fn default_config(&self) -> &SiteConfig {
        &self.default
    }

    /// Registered patterns in resolution order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Resolves the configuration for `hostname`.
    pub fn resolve(&self, hostname: &str) -> &SiteConfig {
        self.resolve_pattern(hostname)
            .and_then(|pattern| self.entries.iter().find(|(key, _)| key == pattern))
            .map(|(_, config)| config)
            .unwrap_or(&self.default)
    }

    /// Pattern that `hostname` resolves to, or `None` for the default.
    pub fn resolve_pattern(&self, hostname: &str) -> Option<&str> {
        let hostname = normalize_hostname(hostname);

        if let Some((key, _)) = self.entries.iter().find(|(key, _)| *key == hostname) {
            return Some(key.as_str());
        }

        self.entries
            .iter()
            .find(|(key, _)| !key.is_empty() && hostname.contains(key.as_str()))
            .map(|(key, _)| key.as_str())
    }
}

impl Default for SiteConfigRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercases a hostname and strips one leading `www.`.
pub fn normalize_hostname(hostname: &str) -> String {
    let hostname = hostname.trim().to_lowercase();
    if let Some(stripped) = hostname.strip_prefix("www.") {
        return stripped.to_string();
    }
    hostname
}
