use crate::error::{ReadModeError, Result};
use crate::extractors::ExtractorKind;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How aggressively a site's content is cleaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Single-author content; comments and related links are noise.
    #[default]
    Article,
    /// Threads where replies are part of the content.
    Discussion,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Article => write!(f, "article"),
            ContentType::Discussion => write!(f, "discussion"),
        }
    }
}

impl FromStr for ContentType {
    type Err = ReadModeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "article" => Ok(ContentType::Article),
            "discussion" => Ok(ContentType::Discussion),
            _ => Err(ReadModeError::SiteConfigError(format!("Invalid content type: {}", s))),
        }
    }
}

/// Represents a single site config directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Content classification
    Type(ContentType),

    /// Selector groups for the article root, tried in order
    Main(String),

    /// Extra selectors removed before the generic cleanup
    Remove(String),

    /// Inputs for custom extractors
    Comments(String),
    CommentsContainer(String),

    /// Behavior options
    PreserveComments(bool),
    Extractor(ExtractorKind),
}

/// Extraction and cleaning rules for one site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConfig {
    /// Content classification
    pub content_type: ContentType,

    /// Selector groups for the article root, tried in order
    pub main_selectors: Vec<String>,

    /// Selector group locating comments (custom extractors only)
    pub comment_selectors: Option<String>,

    /// Selector group locating the element wrapping all comments
    pub comments_container: Option<String>,

    /// Named site-specific extractor tried before `main_selectors`
    pub extractor: Option<ExtractorKind>,

    /// Site-specific removal selectors
    pub remove_selectors: Vec<String>,

    /// Keep comment, discussion and social subtrees during cleanup
    pub preserve_comments: bool,
}

impl SiteConfig {
    /// Create a new empty site config
    pub fn new() -> Self {
        Self::default()
    }

    /// Article config with the given main selectors.
    pub fn article(main_selectors: &[&str]) -> Self {
        Self { main_selectors: main_selectors.iter().map(|s| s.to_string()).collect(), ..Self::default() }
    }

    /// Discussion config with the given main selectors; comments are kept.
    pub fn discussion(main_selectors: &[&str]) -> Self {
        Self {
            content_type: ContentType::Discussion,
            main_selectors: main_selectors.iter().map(|s| s.to_string()).collect(),
            preserve_comments: true,
            ..Self::default()
        }
    }

    /// Sets the comment selector groups.
    pub fn with_comments(mut self, comments: &str, container: Option<&str>) -> Self {
        self.comment_selectors = Some(comments.to_string());
        self.comments_container = container.map(str::to_string);
        self
    }

    /// Sets the custom extractor.
    pub fn with_extractor(mut self, extractor: ExtractorKind) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Sets the site-specific removal selectors.
    pub fn with_remove_selectors(mut self, selectors: &[&str]) -> Self {
        self.remove_selectors = selectors.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a directive to this config
    pub fn add_directive(&mut self, directive: Directive) {
        match directive {
            Directive::Type(content_type) => self.content_type = content_type,
            Directive::Main(selector) => self.main_selectors.push(selector),
            Directive::Remove(selector) => self.remove_selectors.push(selector),
            Directive::Comments(selector) => self.comment_selectors = Some(selector),
            Directive::CommentsContainer(selector) => self.comments_container = Some(selector),
            Directive::PreserveComments(value) => self.preserve_comments = value,
            Directive::Extractor(kind) => self.extractor = Some(kind),
        }
    }

    /// Check if this config can locate content on its own
    pub fn has_extraction_config(&self) -> bool {
        !self.main_selectors.is_empty() || self.extractor.is_some()
    }
}

/// Parse a directive line from the site config format
pub fn parse_directive(line: &str) -> Result<Directive> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Err(ReadModeError::SiteConfigError("Empty or comment line".to_string()));
    }

    if let Some((key, value)) = line.split_once(':') {
        let key = key.trim();
        let value = value.trim();

        match key {
            "type" => Ok(Directive::Type(value.parse()?)),
            "main" => Ok(Directive::Main(value.to_string())),
            "remove" => Ok(Directive::Remove(value.to_string())),
            "comments" => Ok(Directive::Comments(value.to_string())),
            "comments_container" => Ok(Directive::CommentsContainer(value.to_string())),
            "preserve_comments" => {
                let bool_val = parse_boolean(value)?;
                Ok(Directive::PreserveComments(bool_val))
            }
            "extractor" => Ok(Directive::Extractor(value.parse()?)),
            _ => Err(ReadModeError::SiteConfigError(format!("Unknown directive: {}", key))),
        }
    } else {
        Err(ReadModeError::SiteConfigError(format!(
            "Invalid directive format: {}",
            line
        )))
    }
}

/// Parse a boolean value from a site config
fn parse_boolean(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(ReadModeError::SiteConfigError(format!(
            "Invalid boolean value: {}",
            value
        ))),
    }
}
