//! HTML parsing and read-only DOM queries.
//!
//! This module provides the [`Document`] and [`Element`] types. A document
//! represents the live page: it is only ever queried, never mutated. Content
//! that needs cleaning is first cloned into a
//! [`ContentFragment`](crate::fragment::ContentFragment).
//!
//! # Example
//!
//! ```rust
//! use readmode_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Title</title></head>
//!         <body>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.title(), Some("Title".to_string()));
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{ReadModeError, Result};

/// Parses a CSS selector, mapping failures to [`ReadModeError::InvalidSelector`].
pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ReadModeError::InvalidSelector(format!("{}: {}", selector, e)))
}

/// Represents a parsed HTML page.
///
/// # Example
///
/// ```rust
/// use readmode_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse_with_url(html, "https://www.example.com/post").unwrap();
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// assert_eq!(doc.hostname(), Some("www.example.com"));
/// ```
pub struct Document {
    html: Html,
    url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// The document has no URL, so site resolution falls back to the
    /// default configuration.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, url: None })
    }

    /// Parses HTML that was served from `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::InvalidUrl`] if the URL cannot be parsed.
    pub fn parse_with_url(html: &str, url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| ReadModeError::InvalidUrl(format!("{}: {}", url, e)))?;
        let html = Html::parse_document(html);
        Ok(Self { html, url: Some(url) })
    }

    /// Gets the page URL, if known.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Gets the host of the page URL, if known.
    pub fn hostname(&self) -> Option<&str> {
        self.url.as_ref().and_then(|url| url.host_str())
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the entire HTML as a string.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// Selects all elements matching a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::InvalidSelector`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    ///
    /// Mirrors `querySelector`: for a selector group, the first element in
    /// document order that matches any member of the group.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Gets the `<body>` element.
    pub fn body(&'_ self) -> Option<Element<'_>> {
        self.select_first("body").ok().flatten()
    }

    /// Gets the title of the document.
    ///
    /// Returns the text of the `<title>` element with whitespace collapsed,
    /// the way browsers expose `document.title`.
    pub fn title(&self) -> Option<String> {
        let title = self.select_first("title").ok().flatten()?;
        Some(title.text().split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }
}

/// A read-only handle on one element of a [`Document`].
///
/// # Example
///
/// ```rust
/// use readmode_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the text content of this element.
    ///
    /// Like `textContent`, this includes text inside scripts and styles.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::InvalidSelector`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Finds the closest inclusive ancestor matching a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::InvalidSelector`] if the selector is invalid.
    pub fn closest(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = parse_selector(selector)?;
        let found = std::iter::once(self.element)
            .chain(self.element.ancestors().filter_map(ElementRef::wrap))
            .find(|el| sel.matches(el));
        Ok(found.map(|el| Element { element: el }))
    }

    /// Gets the underlying scraper reference.
    pub(crate) fn as_element_ref(&self) -> ElementRef<'a> {
        self.element
    }
}
