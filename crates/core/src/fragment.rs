use ego_tree::{NodeId, Tree};
use scraper::{ElementRef, Html, Node};
use serde::{Serialize, Serializer};

use crate::Result;
use crate::parse::{Element, parse_selector};

/// Appends deep copies of `source`'s children under `parent`.
fn clone_children(tree: &mut Tree<Node>, parent: NodeId, source: ego_tree::NodeRef<'_, Node>) {
    for child in source.children() {
        let Some(mut target) = tree.get_mut(parent) else {
            return;
        };
        let id = target.append(child.value().clone()).id();
        clone_children(tree, id, child);
    }
}

/// An owned, detached copy of a DOM subtree.
///
/// Fragments are what the sanitizer works on: every mutation happens here,
/// never on the [`Document`](crate::parse::Document) the content was copied
/// from.
#[derive(Debug, Clone)]
pub struct ContentFragment {
    html: Html,
    root_id: NodeId,
}

impl ContentFragment {
    /// Deep-clones `element` and everything beneath it into a new fragment.
    pub fn from_element(element: &Element<'_>) -> Self {
        let source = element.as_element_ref();
        let mut html = Html::new_fragment();
        let root_id = html.tree.root_mut().append((*source).value().clone()).id();
        clone_children(&mut html.tree, root_id, *source);
        Self { html, root_id }
    }

    /// Creates a fragment whose root is an empty `<div>`.
    ///
    /// Used by custom extractors to assemble content from several places
    /// on the page.
    pub fn container() -> Self {
        Self::from_markup("<div></div>")
    }

    /// Parses `markup` and roots the fragment at its first element.
    fn from_markup(markup: &str) -> Self {
        let parsed = Html::parse_fragment(markup);
        let first = parsed
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
            .unwrap_or_else(|| parsed.root_element());
        let mut html = Html::new_fragment();
        let root_id = html.tree.root_mut().append((*first).value().clone()).id();
        clone_children(&mut html.tree, root_id, *first);
        Self { html, root_id }
    }

    /// Appends a deep clone of `element` as the last child of the root.
    pub fn append_element(&mut self, element: &Element<'_>) {
        let source = element.as_element_ref();
        if let Some(mut root) = self.html.tree.get_mut(self.root_id) {
            let id = root.append((*source).value().clone()).id();
            clone_children(&mut self.html.tree, id, *source);
        }
    }

    /// Appends a `<div>` holding an `<h2>` heading followed by clones of
    /// `elements`.
    pub fn append_section(&mut self, heading: &str, elements: &[Element<'_>]) {
        let mut section = Self::container();
        let title = format!("<h2>{}</h2>", escape_text(heading));
        let heading_fragment = Html::parse_fragment(&title);
        if let Some(h2) = heading_fragment.root_element().children().find_map(ElementRef::wrap)
            && let Some(mut root) = section.html.tree.get_mut(section.root_id)
        {
            let id = root.append((*h2).value().clone()).id();
            clone_children(&mut section.html.tree, id, *h2);
        }
        for element in elements {
            section.append_element(element);
        }
        self.append_fragment(&section);
    }

    /// Appends a deep clone of another fragment's root.
    pub fn append_fragment(&mut self, other: &ContentFragment) {
        let Some(source) = other.html.tree.get(other.root_id) else {
            return;
        };
        if let Some(mut root) = self.html.tree.get_mut(self.root_id) {
            let id = root.append(source.value().clone()).id();
            clone_children(&mut self.html.tree, id, source);
        }
    }

    /// Gets the root element.
    pub fn root(&self) -> Option<ElementRef<'_>> {
        self.html.tree.get(self.root_id).and_then(ElementRef::wrap)
    }

    /// Gets the lowercase tag name of the root element.
    pub fn root_tag(&self) -> String {
        self.root().map(|el| el.value().name().to_lowercase()).unwrap_or_default()
    }

    /// Gets the text content of the whole fragment.
    pub fn text(&self) -> String {
        self.root().map(|el| el.text().collect()).unwrap_or_default()
    }

    /// Gets the outer HTML of the root element.
    pub fn outer_html(&self) -> String {
        self.root().map(|el| el.html()).unwrap_or_default()
    }

    /// Gets the inner HTML of the root element.
    pub fn inner_html(&self) -> String {
        self.root().map(|el| el.inner_html()).unwrap_or_default()
    }

    /// Number of elements below the root.
    pub fn element_count(&self) -> usize {
        self.descendant_ids().len()
    }

    /// Ids of all elements below the root, in document order.
    pub(crate) fn descendant_ids(&self) -> Vec<NodeId> {
        match self.html.tree.get(self.root_id) {
            Some(root) => root
                .descendants()
                .skip(1)
                .filter(|node| node.value().is_element())
                .map(|node| node.id())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Ids of elements below the root matching a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ReadModeError::InvalidSelector`](crate::ReadModeError) if
    /// the selector is invalid.
    pub(crate) fn matching_ids(&self, selector: &str) -> Result<Vec<NodeId>> {
        let sel = parse_selector(selector)?;
        Ok(self.root().map(|root| root.select(&sel).map(|el| (*el).id()).collect()).unwrap_or_default())
    }

    /// Removes every element below the root matching a CSS selector.
    ///
    /// Returns the number of elements removed.
    pub fn remove_matching(&mut self, selector: &str) -> Result<usize> {
        let ids = self.matching_ids(selector)?;
        let count = ids.len();
        for id in ids {
            self.remove(id);
        }
        Ok(count)
    }

    /// Detaches a node from the tree. The root itself is never detached.
    pub(crate) fn remove(&mut self, id: NodeId) {
        if id == self.root_id {
            return;
        }
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Whether node `id` is still attached beneath the root.
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        if id == self.root_id {
            return true;
        }
        self.html
            .tree
            .get(id)
            .is_some_and(|node| node.ancestors().any(|ancestor| ancestor.id() == self.root_id))
    }

    /// Looks up an element by id.
    pub(crate) fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// Ids of every element in the fragment, root included.
    pub(crate) fn element_ids(&self) -> Vec<NodeId> {
        let mut ids = vec![self.root_id];
        ids.extend(self.descendant_ids());
        ids
    }

    /// Drops every attribute of element `id` whose name is not in `allowed`.
    pub(crate) fn retain_attributes(&mut self, id: NodeId, allowed: &[String]) {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return;
        };
        if let Node::Element(element) = node.value() {
            element
                .attrs
                .retain(|(name, _)| allowed.iter().any(|keep| keep.eq_ignore_ascii_case(&name.local)));
        }
    }

    /// Attribute names of element `id`.
    pub(crate) fn attribute_names(&self, id: NodeId) -> Vec<String> {
        self.element(id)
            .map(|el| el.value().attrs().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default()
    }
}

impl Serialize for ContentFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.outer_html())
    }
}

/// Escapes text for inclusion in HTML element content.
pub(crate) fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;

    const PAGE: &str = r#"
        <html><body>
            <article id="post" class="story">
                <p>First <b>bold</b> paragraph.</p>
                <div class="ad-slot">Buy now</div>
                <p>Second paragraph.</p>
            </article>
            <div id="comments"><p>A comment</p></div>
        </body></html>
    "#;

    #[test]
    fn test_from_element_is_deep_clone() {
        let doc = Document::parse(PAGE).unwrap();
        let article = doc.select_first("article").unwrap().unwrap();
        let fragment = ContentFragment::from_element(&article);

        assert_eq!(fragment.root_tag(), "article");
        assert!(fragment.text().contains("bold"));
        assert!(fragment.outer_html().contains(r#"class="story""#));
        assert!(!fragment.text().contains("A comment"));
    }

    #[test]
    fn test_remove_matching_leaves_document_untouched() {
        let doc = Document::parse(PAGE).unwrap();
        let before = doc.as_string();
        let article = doc.select_first("article").unwrap().unwrap();
        let mut fragment = ContentFragment::from_element(&article);

        let removed = fragment.remove_matching(".ad-slot").unwrap();
        assert_eq!(removed, 1);
        assert!(!fragment.text().contains("Buy now"));
        assert_eq!(doc.as_string(), before);
        assert!(doc.text_content().contains("Buy now"));
    }

    #[test]
    fn test_remove_matching_invalid_selector() {
        let doc = Document::parse(PAGE).unwrap();
        let article = doc.select_first("article").unwrap().unwrap();
        let mut fragment = ContentFragment::from_element(&article);

        assert!(fragment.remove_matching("[[nope").is_err());
        assert!(fragment.text().contains("Buy now"));
    }

    #[test]
    fn test_root_is_never_removed() {
        let doc = Document::parse(PAGE).unwrap();
        let article = doc.select_first("article").unwrap().unwrap();
        let mut fragment = ContentFragment::from_element(&article);

        let root_id = fragment.element_ids()[0];
        fragment.remove(root_id);
        assert_eq!(fragment.root_tag(), "article");
    }

    #[test]
    fn test_container_with_sections() {
        let doc = Document::parse(PAGE).unwrap();
        let article = doc.select_first("article").unwrap().unwrap();
        let comments = doc.select_first("#comments").unwrap().unwrap();

        let mut fragment = ContentFragment::container();
        fragment.append_element(&article);
        fragment.append_section("Comments", &[comments]);

        assert_eq!(fragment.root_tag(), "div");
        let html = fragment.inner_html();
        assert!(html.starts_with("<article"));
        assert!(html.contains("<h2>Comments</h2>"));
        assert!(fragment.text().contains("A comment"));
    }

    #[test]
    fn test_retain_attributes() {
        let doc = Document::parse(PAGE).unwrap();
        let article = doc.select_first("article").unwrap().unwrap();
        let mut fragment = ContentFragment::from_element(&article);

        let root_id = fragment.element_ids()[0];
        fragment.retain_attributes(root_id, &["id".to_string()]);
        assert_eq!(fragment.attribute_names(root_id), vec!["id".to_string()]);
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
