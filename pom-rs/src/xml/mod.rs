//! Formatting-preserving XML editing.
//!
//! This module is the structural editor the merge engine works against:
//! it parses a document into a tree of [`XmlNode`]s, lets callers find,
//! add and remove elements or replace text, and prints the tree back with
//! every untouched byte intact.

mod node;
mod parser;
mod printer;

pub use node::{XmlElement, XmlNode, XmlText};
pub use parser::{parse_file, parse_str};
pub use printer::{element_to_string, print_to_string, XmlPrinter};

use std::path::Path;

use crate::constants::DEFAULT_INDENT;
use crate::error::Result;

/// Layout used for newly inserted nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlFormat {
    /// One level of indentation.
    pub indent_unit: String,
    /// Line terminator.
    pub line_ending: String,
}

impl Default for XmlFormat {
    fn default() -> Self {
        XmlFormat {
            indent_unit: DEFAULT_INDENT.to_string(),
            line_ending: "\n".to_string(),
        }
    }
}

impl XmlFormat {
    /// Detects the layout of a parsed document.
    ///
    /// The indentation unit is taken from the first indented child of the
    /// root element; CRLF wins if it appears anywhere in the source.
    pub fn detect(source: &str, root: &XmlElement) -> Self {
        let mut format = XmlFormat::default();
        if source.contains("\r\n") {
            format.line_ending = "\r\n".to_string();
        }
        let unit = root
            .child_elements()
            .map(XmlElement::indent)
            .find(|indent| indent.len() > root.indent().len())
            .and_then(|indent| indent.strip_prefix(root.indent()));
        if let Some(unit) = unit {
            format.indent_unit = unit.to_string();
        }
        format
    }
}

/// A parsed document.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    /// Top-level nodes: prolog, the root element, epilog.
    nodes: Vec<XmlNode>,
    root_index: usize,
    format: XmlFormat,
}

impl XmlDocument {
    pub(crate) fn from_parts(nodes: Vec<XmlNode>, root_index: usize, source: &str) -> Self {
        let format = match nodes[root_index].as_element() {
            Some(root) => XmlFormat::detect(source, root),
            None => XmlFormat::default(),
        };
        XmlDocument {
            nodes,
            root_index,
            format,
        }
    }

    /// Parses a document from a string.
    pub fn parse(source: &str) -> Result<Self> {
        parse_str(source)
    }

    /// Parses a document from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        parse_file(path)
    }

    /// Returns the top-level nodes.
    pub fn nodes(&self) -> &[XmlNode] {
        &self.nodes
    }

    /// Returns the detected layout.
    pub fn format(&self) -> &XmlFormat {
        &self.format
    }

    /// Returns the root element.
    pub fn root(&self) -> &XmlElement {
        match &self.nodes[self.root_index] {
            XmlNode::Element(root) => root,
            other => unreachable!("root node is not an element: {:?}", other),
        }
    }

    /// Returns the root element mutably.
    pub fn root_mut(&mut self) -> &mut XmlElement {
        match &mut self.nodes[self.root_index] {
            XmlNode::Element(root) => root,
            other => unreachable!("root node is not an element: {:?}", other),
        }
    }
}

impl std::fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&print_to_string(self))
    }
}
