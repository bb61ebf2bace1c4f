//! POM properties.

use std::fmt;

use crate::error::{Error, Result};

/// A property to set or remove.
///
/// A `None` value is a removal request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    name: String,
    value: Option<String>,
}

impl Property {
    /// Creates a property, rejecting a blank name or one that cannot be an
    /// element name.
    pub fn new(name: impl Into<String>, value: Option<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::validation("name must be provided"));
        }
        if !is_xml_name(&name) {
            return Err(Error::validation(format!(
                "'{}' is not a valid property name",
                name
            )));
        }
        Ok(Property { name, value })
    }

    /// Shorthand for a property that sets `value`.
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        Property::new(name, Some(value.into()))
    }

    /// Shorthand for a removal request.
    pub fn remove(name: impl Into<String>) -> Result<Self> {
        Property::new(name, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_removal(&self) -> bool {
        self.value.is_none()
    }
}

/// Checks the XML `Name` production, which every element name must match.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | '_' | 'A'..='Z' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{{name='{}', value='{}'}}", self.name, value),
            None => write!(f, "{{name='{}', value=null}}", self.name),
        }
    }
}
