//! XML printer that writes node trees back out.
//!
//! Nodes are printed from the text they carry, so the output matches the
//! input everywhere the tree was not edited.

use std::io::Write;

use super::{XmlDocument, XmlElement, XmlNode};

/// XML printer that outputs node trees.
pub struct XmlPrinter<W: Write> {
    writer: W,
}

impl<W: Write> XmlPrinter<W> {
    /// Creates a new XML printer.
    pub fn new(writer: W) -> Self {
        XmlPrinter { writer }
    }

    /// Prints a whole document.
    pub fn print(&mut self, document: &XmlDocument) -> std::io::Result<()> {
        for node in document.nodes() {
            self.print_node(node)?;
        }
        self.writer.flush()
    }

    /// Prints a single element and its subtree.
    pub fn print_element(&mut self, element: &XmlElement) -> std::io::Result<()> {
        self.writer.write_all(element.start_tag().as_bytes())?;
        for child in element.children() {
            self.print_node(child)?;
        }
        if let Some(end_tag) = element.end_tag() {
            self.writer.write_all(end_tag.as_bytes())?;
        }
        Ok(())
    }

    fn print_node(&mut self, node: &XmlNode) -> std::io::Result<()> {
        match node {
            XmlNode::Element(element) => self.print_element(element),
            XmlNode::Text(text) => self.writer.write_all(text.raw().as_bytes()),
            XmlNode::CData(raw) | XmlNode::Comment(raw) | XmlNode::Markup(raw) => {
                self.writer.write_all(raw.as_bytes())
            }
        }
    }
}

/// Prints a document to a string.
pub fn print_to_string(document: &XmlDocument) -> String {
    let mut output = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = XmlPrinter::new(&mut output).print(document);
    String::from_utf8_lossy(&output).into_owned()
}

/// Prints a single element to a string.
pub fn element_to_string(element: &XmlElement) -> String {
    let mut output = Vec::new();
    let _ = XmlPrinter::new(&mut output).print_element(element);
    String::from_utf8_lossy(&output).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn test_print_simple() {
        let xml = r#"<root>text</root>"#;
        let doc = parse_str(xml).unwrap();
        assert_eq!(print_to_string(&doc), xml);
    }

    #[test]
    fn test_print_keeps_declaration_and_comments() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- c -->\n<root/>\n";
        let doc = parse_str(xml).unwrap();
        assert_eq!(print_to_string(&doc), xml);
    }

    #[test]
    fn test_print_element_fragment() {
        let doc = parse_str("<a>\n  <b x=\"1\">t</b>\n</a>").unwrap();
        let b = doc.root().find_child("b").unwrap();
        assert_eq!(element_to_string(b), "<b x=\"1\">t</b>");
    }

    #[test]
    fn test_double_round_trip() {
        let xml = r#"<doc><section id="s1"><para>First.</para><para>Second.</para></section></doc>"#;
        let first = print_to_string(&parse_str(xml).unwrap());
        let second = print_to_string(&parse_str(&first).unwrap());
        assert_eq!(first, second);
    }
}
