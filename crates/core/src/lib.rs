pub mod error;
pub mod extract;
pub mod extractors;
pub mod formatters;
pub mod fragment;
pub mod parse;
pub mod readmode;
pub mod result;
pub mod sanitize;
pub mod session;
pub mod siteconfig;
pub mod title;

pub use error::{ReadModeError, Result};
pub use extract::{ContentLocator, ExtractConfig, Strategy, has_enough_text, locate};
pub use extractors::ExtractorKind;
pub use formatters::{HtmlConfig, HtmlFormatter, JsonConfig, JsonFormatter, MarkdownConfig, MarkdownFormatter};
pub use formatters::{TextConfig, TextFormatter, convert_to_json, convert_to_markdown, convert_to_text, render_reading_view};
pub use fragment::ContentFragment;
pub use parse::{Document, Element};
pub use readmode::{ReadMode, ReadModeConfig, ReadModeConfigBuilder, is_probably_readable, parse, parse_with_url};
pub use result::{ExtractionResult, OutputFormat};
pub use sanitize::{ContentSanitizer, SanitizeConfig, SanitizeStats};
pub use session::{KeyEvent, KeySequence, Presenter, ReadingSession, SessionState};
#[cfg(feature = "siteconfig")]
pub use siteconfig::{ConfigLoader, ConfigLoaderBuilder};
pub use siteconfig::{ConfigParser, ContentType, Directive, SiteConfig, SiteConfigRegistry};
pub use title::resolve_title;
