//! Node structures for the editable XML tree.
//!
//! Every node keeps the exact source text it was parsed from. Untouched
//! nodes therefore print back byte-for-byte; only nodes created or changed
//! through the editing methods below produce new text.

use std::borrow::Cow;

use quick_xml::escape::{partial_escape, unescape};

use super::XmlFormat;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// An element with its children.
    Element(XmlElement),
    /// Character data, kept escaped exactly as written.
    Text(XmlText),
    /// A `<![CDATA[...]]>` section, raw.
    CData(String),
    /// A `<!-- ... -->` comment, raw.
    Comment(String),
    /// XML declaration, processing instruction or DOCTYPE, raw.
    Markup(String),
}

impl XmlNode {
    /// Returns the element, if this is an element node.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element, if this is an element node.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true for text nodes made only of whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, XmlNode::Text(t) if t.is_whitespace())
    }
}

/// Escaped character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlText {
    raw: String,
}

impl XmlText {
    /// Wraps already-escaped text.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        XmlText { raw: raw.into() }
    }

    /// Creates a text node from an unescaped value.
    pub fn new(value: &str) -> Self {
        XmlText {
            raw: partial_escape(value).into_owned(),
        }
    }

    /// Returns the text as written in the document.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub(crate) fn push_raw(&mut self, raw: &str) {
        self.raw.push_str(raw);
    }

    /// Returns the unescaped value. Unknown entities are left as written.
    pub fn value(&self) -> Cow<'_, str> {
        unescape(&self.raw).unwrap_or(Cow::Borrowed(&self.raw))
    }

    /// Returns true if the text holds nothing but whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.raw.chars().all(char::is_whitespace)
    }
}

/// An XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified name, e.g. `dependency`.
    name: String,
    /// Start tag as written, including `<` and `>` (or `/>`).
    start_tag: String,
    /// End tag as written; `None` for a self-closing element.
    end_tag: Option<String>,
    /// Whitespace preceding the start tag on its line.
    indent: String,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates a new, empty element named `name`.
    pub fn new(name: &str) -> Self {
        XmlElement {
            name: name.to_string(),
            start_tag: format!("<{}>", name),
            end_tag: Some(format!("</{}>", name)),
            indent: String::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn from_parts(name: String, start_tag: String, indent: String) -> Self {
        XmlElement {
            name,
            start_tag,
            end_tag: None,
            indent,
            children: Vec::new(),
        }
    }

    pub(crate) fn set_end_tag(&mut self, end_tag: &str) {
        self.end_tag = Some(end_tag.to_string());
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    /// Returns the qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the start tag as it will be printed.
    pub fn start_tag(&self) -> &str {
        &self.start_tag
    }

    /// Returns the end tag as it will be printed, if any.
    pub fn end_tag(&self) -> Option<&str> {
        self.end_tag.as_deref()
    }

    /// Returns the indentation of this element's line.
    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Returns true for `<name/>` elements.
    pub fn is_self_closing(&self) -> bool {
        self.end_tag.is_none()
    }

    /// Returns all child nodes.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Iterates over child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Iterates mutably over child elements.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(XmlNode::as_element_mut)
    }

    /// Returns the first child element named `name`.
    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.name == name)
    }

    /// Returns the first child element named `name`, mutably.
    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.child_elements_mut().find(|e| e.name == name)
    }

    /// Returns the trimmed, unescaped text of the first child named `name`.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.find_child(name).map(XmlElement::text)
    }

    /// Returns the trimmed, unescaped text content of this element.
    ///
    /// Only direct text and CDATA children contribute.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(t) => text.push_str(&t.value()),
                XmlNode::CData(raw) => text.push_str(cdata_content(raw)),
                _ => {}
            }
        }
        text.trim().to_string()
    }

    /// Replaces the content of this element with `value`.
    ///
    /// Returns false, leaving the element untouched, when the current text
    /// already equals `value`.
    pub fn set_text(&mut self, value: &str) -> bool {
        let has_elements = self.child_elements().next().is_some();
        if !has_elements && self.text() == value {
            return false;
        }
        self.open();
        self.children = vec![XmlNode::Text(XmlText::new(value))];
        true
    }

    /// Appends a new empty child element and returns it.
    pub fn add_child_element(&mut self, name: &str, format: &XmlFormat) -> &mut XmlElement {
        let index = self.push_child(XmlElement::new(name), format);
        self.element_at_mut(index)
    }

    /// Appends `<name>value</name>` and returns it.
    pub fn add_text_element(
        &mut self,
        name: &str,
        value: &str,
        format: &XmlFormat,
    ) -> &mut XmlElement {
        let mut element = XmlElement::new(name);
        element.children.push(XmlNode::Text(XmlText::new(value)));
        let index = self.push_child(element, format);
        self.element_at_mut(index)
    }

    /// Inserts a new empty child element before the `position`-th child
    /// element, or appends it when there are not that many.
    pub fn insert_child_element(
        &mut self,
        position: usize,
        name: &str,
        format: &XmlFormat,
    ) -> &mut XmlElement {
        let target = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n, XmlNode::Element(_)))
            .map(|(i, _)| i)
            .nth(position);

        let index = match target {
            Some(node_index) => {
                let mut element = XmlElement::new(name);
                element.indent = self.child_indent(format);
                let separator = format!("{}{}", format.line_ending, element.indent);
                self.children
                    .insert(node_index, XmlNode::Text(XmlText::from_raw(separator)));
                self.children.insert(node_index, XmlNode::Element(element));
                node_index
            }
            None => self.push_child(XmlElement::new(name), format),
        };
        self.element_at_mut(index)
    }

    /// Returns the first child named `name`, appending it when absent.
    pub fn get_or_add_child(&mut self, name: &str, format: &XmlFormat) -> &mut XmlElement {
        let existing = self
            .children
            .iter()
            .position(|n| matches!(n, XmlNode::Element(e) if e.name == name));
        let index = match existing {
            Some(index) => index,
            None => self.push_child(XmlElement::new(name), format),
        };
        self.element_at_mut(index)
    }

    /// Removes the first child element named `name` together with the
    /// whitespace run in front of it.
    pub fn remove_child_element(&mut self, name: &str) -> Option<XmlElement> {
        let index = self
            .children
            .iter()
            .position(|n| matches!(n, XmlNode::Element(e) if e.name == name))?;
        let removed = self.children.remove(index);
        if index > 0 && self.children[index - 1].is_whitespace() {
            self.children.remove(index - 1);
        }
        match removed {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Indentation for a new child: that of the existing child elements,
    /// or one unit deeper than this element.
    fn child_indent(&self, format: &XmlFormat) -> String {
        match self.child_elements().next() {
            Some(first) => first.indent.clone(),
            None => format!("{}{}", self.indent, format.indent_unit),
        }
    }

    /// Appends `element` after the last child, keeping the closing tag on
    /// its own line. Returns the node index of the element.
    fn push_child(&mut self, mut element: XmlElement, format: &XmlFormat) -> usize {
        element.indent = self.child_indent(format);
        let separator = format!("{}{}", format.line_ending, element.indent);
        self.open();

        let trailing_whitespace = self.children.last().is_some_and(XmlNode::is_whitespace);
        if trailing_whitespace {
            let at = self.children.len() - 1;
            self.children
                .insert(at, XmlNode::Text(XmlText::from_raw(separator)));
            self.children.insert(at + 1, XmlNode::Element(element));
            at + 1
        } else {
            let closing = format!("{}{}", format.line_ending, self.indent);
            self.children
                .push(XmlNode::Text(XmlText::from_raw(separator)));
            self.children.push(XmlNode::Element(element));
            self.children.push(XmlNode::Text(XmlText::from_raw(closing)));
            self.children.len() - 2
        }
    }

    /// Turns `<name/>` into `<name></name>` so it can hold content.
    fn open(&mut self) {
        if self.end_tag.is_some() {
            return;
        }
        let head = self
            .start_tag
            .strip_suffix("/>")
            .unwrap_or(&self.start_tag)
            .trim_end();
        self.start_tag = format!("{}>", head);
        self.end_tag = Some(format!("</{}>", self.name));
    }

    fn element_at_mut(&mut self, index: usize) -> &mut XmlElement {
        match &mut self.children[index] {
            XmlNode::Element(element) => element,
            other => unreachable!("child {} is not an element: {:?}", index, other),
        }
    }
}

/// Strips the `<![CDATA[` / `]]>` delimiters.
fn cdata_content(raw: &str) -> &str {
    raw.strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{parse_str, print_to_string};

    fn format() -> XmlFormat {
        XmlFormat::default()
    }

    #[test]
    fn test_text_is_unescaped_and_trimmed() {
        let doc = parse_str("<a>\n  x &amp; y\n</a>").unwrap();
        assert_eq!(doc.root().text(), "x & y");
    }

    #[test]
    fn test_cdata_contributes_to_text() {
        let doc = parse_str("<a><![CDATA[1 < 2]]></a>").unwrap();
        assert_eq!(doc.root().text(), "1 < 2");
    }

    #[test]
    fn test_set_text_unchanged_is_noop() {
        let mut doc = parse_str("<a><v>1.0</v></a>").unwrap();
        let v = doc.root_mut().find_child_mut("v").unwrap();
        assert!(!v.set_text("1.0"));
        assert!(v.set_text("2.0"));
        assert_eq!(print_to_string(&doc), "<a><v>2.0</v></a>");
    }

    #[test]
    fn test_set_text_escapes() {
        let mut doc = parse_str("<a><v/></a>").unwrap();
        doc.root_mut().find_child_mut("v").unwrap().set_text("a<b&c");
        assert_eq!(print_to_string(&doc), "<a><v>a&lt;b&amp;c</v></a>");
    }

    #[test]
    fn test_add_child_follows_sibling_indent() {
        let mut doc = parse_str("<a>\n  <b>1</b>\n</a>\n").unwrap();
        doc.root_mut().add_text_element("c", "2", &format());
        assert_eq!(
            print_to_string(&doc),
            "<a>\n  <b>1</b>\n  <c>2</c>\n</a>\n"
        );
    }

    #[test]
    fn test_add_child_to_empty_element_goes_one_level_deeper() {
        let mut doc = parse_str("<a>\n    <b></b>\n</a>").unwrap();
        let f = format();
        doc.root_mut()
            .find_child_mut("b")
            .unwrap()
            .add_text_element("c", "x", &f);
        assert_eq!(
            print_to_string(&doc),
            "<a>\n    <b>\n        <c>x</c>\n    </b>\n</a>"
        );
    }

    #[test]
    fn test_add_child_opens_self_closing_element() {
        let mut doc = parse_str("<a>\n    <b />\n</a>").unwrap();
        let f = format();
        doc.root_mut()
            .find_child_mut("b")
            .unwrap()
            .add_text_element("c", "x", &f);
        assert_eq!(
            print_to_string(&doc),
            "<a>\n    <b>\n        <c>x</c>\n    </b>\n</a>"
        );
    }

    #[test]
    fn test_insert_child_element_before_sibling() {
        let mut doc = parse_str("<a>\n  <b/>\n  <d/>\n</a>").unwrap();
        let f = format();
        doc.root_mut().insert_child_element(1, "c", &f);
        assert_eq!(
            print_to_string(&doc),
            "<a>\n  <b/>\n  <c></c>\n  <d/>\n</a>"
        );
    }

    #[test]
    fn test_insert_child_element_past_end_appends() {
        let mut doc = parse_str("<a>\n  <b/>\n</a>").unwrap();
        let f = format();
        doc.root_mut().insert_child_element(7, "c", &f);
        assert_eq!(print_to_string(&doc), "<a>\n  <b/>\n  <c></c>\n</a>");
    }

    #[test]
    fn test_get_or_add_child_is_idempotent() {
        let mut doc = parse_str("<a>\n  <b/>\n</a>").unwrap();
        let f = format();
        doc.root_mut().get_or_add_child("c", &f);
        let once = print_to_string(&doc);
        doc.root_mut().get_or_add_child("c", &f);
        assert_eq!(print_to_string(&doc), once);
        assert_eq!(doc.root().child_elements().count(), 2);
    }

    #[test]
    fn test_remove_child_element_takes_leading_whitespace() {
        let mut doc = parse_str("<a>\n  <b/>\n  <c>x</c>\n</a>").unwrap();
        let removed = doc.root_mut().remove_child_element("c").unwrap();
        assert_eq!(removed.text(), "x");
        assert_eq!(print_to_string(&doc), "<a>\n  <b/>\n</a>");
    }

    #[test]
    fn test_remove_missing_child() {
        let mut doc = parse_str("<a><b/></a>").unwrap();
        assert!(doc.root_mut().remove_child_element("zzz").is_none());
        assert_eq!(print_to_string(&doc), "<a><b/></a>");
    }
}
