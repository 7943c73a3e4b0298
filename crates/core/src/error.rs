//! Error types for reading-mode operations.
//!
//! This module defines the main error type [`ReadModeError`]. Most failures
//! during extraction are recovered where they happen (an invalid selector is
//! skipped, a failing custom extractor falls through to the next strategy),
//! so these errors mostly surface from the convenience API and from loading
//! site configuration files.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::{ReadModeError, Result};
//!
//! fn extract_article(html: &str) -> Result<String> {
//!     if html.is_empty() {
//!         return Err(ReadModeError::NoContent);
//!     }
//!     // ... extraction logic
//!     # Ok(String::new())
//! }
//! ```

use thiserror::Error;

/// Main error type for reading-mode extraction.
///
/// # Example
///
/// ```rust
/// use readmode_core::{ReadModeError, ReadMode};
///
/// match ReadMode::new().parse("<html><body><p>Too short</p></body></html>") {
///     Ok(result) => println!("Title: {}", result.title),
///     Err(ReadModeError::NoContent) => println!("Page left unchanged"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ReadModeError {
    /// No extraction strategy produced enough text.
    ///
    /// The page is left unchanged when this happens.
    #[error("No readable content could be extracted from the document")]
    NoContent,

    /// A CSS selector could not be parsed.
    ///
    /// Returned by the low-level query helpers. The extraction pipeline
    /// catches it and skips the offending selector.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A site-specific extractor failed.
    #[error("Custom extractor '{extractor}' failed: {reason}")]
    CustomExtractor { extractor: String, reason: String },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Site configuration errors.
    ///
    /// Returned when site configuration files are missing or invalid.
    #[error("Site configuration error: {0}")]
    SiteConfigError(String),

    /// Unknown output format name.
    #[error("Invalid output format: {0}")]
    InvalidFormat(String),

    /// I/O errors while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors for JSON output.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for ReadModeError.
///
/// This is a convenience alias for `std::result::Result<T, ReadModeError>`.
pub type Result<T> = std::result::Result<T, ReadModeError>;
