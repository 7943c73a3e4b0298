//! Site-specific extraction strategies.
//!
//! Some sites spread their readable content across several places on the
//! page (a post and its comment tree, a tweet and its replies). A custom
//! extractor gathers those pieces into one synthetic container. Extractors
//! are referenced from a [`SiteConfig`] by [`ExtractorKind`] so that
//! configuration stays plain data.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::fragment::ContentFragment;
use crate::parse::{Document, Element};
use crate::siteconfig::SiteConfig;
use crate::{ReadModeError, Result};

const TWEET: &str = "[data-testid=\"tweet\"]";

/// Minimum body text length for a Paul Graham essay page.
const ESSAY_MIN_CHARS: usize = 1000;

/// Named custom extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Post plus the wrapper around its comment tree.
    Reddit,
    /// First tweet plus every following tweet as replies. Also used for x.com.
    Twitter,
    /// Story or comment item plus its comment tree.
    HackerNews,
    /// The whole body, for long plain essay pages.
    PaulGraham,
}

impl ExtractorKind {
    /// Configuration name of this extractor.
    pub fn name(&self) -> &'static str {
        match self {
            ExtractorKind::Reddit => "reddit",
            ExtractorKind::Twitter => "twitter",
            ExtractorKind::HackerNews => "hacker_news",
            ExtractorKind::PaulGraham => "paul_graham",
        }
    }

    /// Runs the extractor against `doc`.
    ///
    /// Returns `Ok(None)` when the page does not have the expected shape.
    /// The returned fragment has not been through the text gate yet.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::CustomExtractor`] when a selector from the
    /// configuration cannot be parsed.
    pub fn extract(&self, doc: &Document, config: &SiteConfig) -> Result<Option<ContentFragment>> {
        match self {
            ExtractorKind::Reddit => self.post_with_comments(doc, config, true),
            ExtractorKind::HackerNews => self.post_with_comments(doc, config, false),
            ExtractorKind::Twitter => self.thread(doc),
            ExtractorKind::PaulGraham => Ok(essay(doc)),
        }
    }

    /// Main item followed by a "Comments" section.
    ///
    /// With `use_container`, the comments section holds the closest
    /// `comments_container` ancestor of the first comment rather than the
    /// comment itself.
    fn post_with_comments(
        &self, doc: &Document, config: &SiteConfig, use_container: bool,
    ) -> Result<Option<ContentFragment>> {
        let Some(main) = config.main_selectors.first() else {
            return Ok(None);
        };
        let Some(post) = self.query(doc, main)? else {
            return Ok(None);
        };

        let comments = match &config.comment_selectors {
            Some(selector) => self.query(doc, selector)?,
            None => None,
        };
        let comments = match (comments, use_container) {
            (Some(comment), true) => match &config.comments_container {
                Some(container) => comment.closest(container).map_err(|e| self.failure(e))?,
                None => None,
            },
            (comments, _) => comments,
        };

        let mut fragment = ContentFragment::container();
        fragment.append_element(&post);
        if let Some(comments) = comments {
            fragment.append_section("Comments", &[comments]);
        }
        Ok(Some(fragment))
    }

    fn thread(&self, doc: &Document) -> Result<Option<ContentFragment>> {
        let tweets = doc.select(TWEET).map_err(|e| self.failure(e))?;
        let Some((main, replies)) = tweets.split_first() else {
            return Ok(None);
        };

        let mut fragment = ContentFragment::container();
        fragment.append_element(main);
        if !replies.is_empty() {
            fragment.append_section("Replies", replies);
        }
        Ok(Some(fragment))
    }

    fn query<'a>(&self, doc: &'a Document, selector: &str) -> Result<Option<Element<'a>>> {
        doc.select_first(selector).map_err(|e| self.failure(e))
    }

    fn failure(&self, err: ReadModeError) -> ReadModeError {
        ReadModeError::CustomExtractor { extractor: self.name().to_string(), reason: err.to_string() }
    }
}

fn essay(doc: &Document) -> Option<ContentFragment> {
    let body = doc.body()?;
    if body.text().chars().count() > ESSAY_MIN_CHARS { Some(ContentFragment::from_element(&body)) } else { None }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExtractorKind {
    type Err = ReadModeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reddit" => Ok(ExtractorKind::Reddit),
            "twitter" | "x" => Ok(ExtractorKind::Twitter),
            "hacker_news" | "hackernews" => Ok(ExtractorKind::HackerNews),
            "paul_graham" | "paulgraham" => Ok(ExtractorKind::PaulGraham),
            _ => Err(ReadModeError::SiteConfigError(format!("Unknown extractor: {}", s))),
        }
    }
}
