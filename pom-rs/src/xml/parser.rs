//! XML parser that builds editable node trees.
//!
//! This parser uses quick-xml's streaming API. Instead of re-encoding the
//! events it slices the input between consecutive reader positions, so each
//! node carries the bytes it was read from.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{XmlDocument, XmlElement, XmlNode, XmlText};
use crate::error::{Error, Result};

const BOM: &str = "\u{feff}";

/// Parses XML from a string.
pub fn parse_str(source: &str) -> Result<XmlDocument> {
    let mut builder = TreeBuilder::default();

    // Reader positions do not count a byte order mark, so it is kept
    // aside and the rest is read on its own.
    let xml = match source.strip_prefix(BOM) {
        Some(rest) => {
            builder.push(XmlNode::Markup(BOM.to_string()));
            rest
        }
        None => source,
    };

    let mut reader = Reader::from_str(xml);
    // Whitespace is content here; it is printed back verbatim.
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut last = 0usize;

    loop {
        let event = reader.read_event()?;
        let position = reader.buffer_position() as usize;
        let raw = &xml[last..position];
        last = position;

        match event {
            Event::Start(ref e) => builder.start(element_name(e)?, raw),
            Event::Empty(ref e) => builder.empty(element_name(e)?, raw),
            Event::End(_) => builder.end(raw)?,
            Event::Text(_) | Event::GeneralRef(_) => builder.text(raw),
            Event::CData(_) => builder.push(XmlNode::CData(raw.to_string())),
            Event::Comment(_) => builder.push(XmlNode::Comment(raw.to_string())),
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {
                builder.push(XmlNode::Markup(raw.to_string()))
            }
            Event::Eof => break,
        }
    }

    builder.finish(source)
}

/// Parses XML from a file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<XmlDocument> {
    let source = fs::read_to_string(path)?;
    parse_str(&source)
}

fn element_name(e: &BytesStart) -> Result<String> {
    std::str::from_utf8(e.name().as_ref())
        .map(str::to_string)
        .map_err(|e| Error::Parse(e.to_string()))
}

/// Whitespace after the last line break of `previous`, if it is text.
fn indent_after(previous: Option<&XmlNode>) -> String {
    let Some(XmlNode::Text(text)) = previous else {
        return String::new();
    };
    match text.raw().rfind('\n') {
        Some(pos) => {
            let tail = &text.raw()[pos + 1..];
            if tail.chars().all(|c| c == ' ' || c == '\t') {
                tail.to_string()
            } else {
                String::new()
            }
        }
        None => String::new(),
    }
}

/// Stack-based tree assembly.
#[derive(Default)]
struct TreeBuilder {
    /// Nodes outside the root element (prolog, root, epilog).
    top: Vec<XmlNode>,
    /// Elements whose end tag has not been seen yet.
    stack: Vec<XmlElement>,
}

impl TreeBuilder {
    fn siblings(&mut self) -> &mut Vec<XmlNode> {
        match self.stack.last_mut() {
            Some(parent) => parent.children_mut(),
            None => &mut self.top,
        }
    }

    fn push(&mut self, node: XmlNode) {
        self.siblings().push(node);
    }

    fn start(&mut self, name: String, raw: &str) {
        let indent = indent_after(self.siblings().last());
        self.stack
            .push(XmlElement::from_parts(name, raw.to_string(), indent));
    }

    fn empty(&mut self, name: String, raw: &str) {
        let indent = indent_after(self.siblings().last());
        let element = XmlElement::from_parts(name, raw.to_string(), indent);
        self.push(XmlNode::Element(element));
    }

    fn end(&mut self, raw: &str) -> Result<()> {
        let mut element = self
            .stack
            .pop()
            .ok_or_else(|| Error::Parse(format!("unexpected closing tag '{}'", raw)))?;
        element.set_end_tag(raw);
        self.push(XmlNode::Element(element));
        Ok(())
    }

    fn text(&mut self, raw: &str) {
        // Entity references arrive as separate events; keep one text node.
        if let Some(XmlNode::Text(text)) = self.siblings().last_mut() {
            text.push_raw(raw);
            return;
        }
        self.push(XmlNode::Text(XmlText::from_raw(raw)));
    }

    fn finish(self, source: &str) -> Result<XmlDocument> {
        if let Some(open) = self.stack.last() {
            return Err(Error::Parse(format!(
                "element <{}> is never closed",
                open.name()
            )));
        }
        let root_index = self
            .top
            .iter()
            .position(|n| matches!(n, XmlNode::Element(_)))
            .ok_or_else(|| Error::Parse("document has no root element".to_string()))?;
        Ok(XmlDocument::from_parts(self.top, root_index, source))
    }
}
