//! A small owned element tree over `quick-xml` events.
//!
//! The bank parser needs random access to children and the full attribute set
//! of each element, so events are folded into [`Element`] values first.

use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;

use crate::errors::ParseError;

/// An XML element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub name: String,
    /// `(name, value)` pairs, values unescaped and normalized.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order. Text content is dropped.
    pub children: Vec<Element>,
}

impl Element {
    /// Value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Immediate children with the given tag.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Renders the element (and its children) back to markup for diagnostics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.render_into(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Parses a complete document and returns its root element.
pub fn parse_document(text: &str) -> Result<Element, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                ensure_single_root(root.as_ref())?;
                stack.push(open_element(&start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(root.as_ref())?;
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(end) => {
                let name = decode_name(end.name().as_ref())?;
                let element = stack.pop().ok_or_else(|| {
                    ParseError::Malformed(format!("unexpected closing tag </{}>", name))
                })?;
                if element.name != name {
                    return Err(ParseError::Malformed(format!(
                        "mismatched tag: expected </{}>, found </{}>",
                        element.name, name
                    )));
                }
                attach(&mut stack, &mut root, element);
            }
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) if stack.is_empty() => {
                return Err(ParseError::Malformed(
                    "text outside of the document element".to_string(),
                ));
            }
            Event::GeneralRef(reference) => check_reference(&reference)?,
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| ParseError::Malformed("no document element".to_string()))
}

fn ensure_single_root(root: Option<&Element>) -> Result<(), ParseError> {
    if root.is_some() {
        return Err(ParseError::Malformed(
            "junk after document element".to_string(),
        ));
    }
    Ok(())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, ParseError> {
    let name = decode_name(start.name().as_ref())?;
    check_name(&name)?;
    check_attribute_spacing(&name, &start[..])?;
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = decode_name(attribute.key.as_ref())?;
        check_name(&key)?;
        let raw = std::str::from_utf8(&attribute.value)
            .map_err(|e| ParseError::Malformed(format!("invalid UTF-8 in attribute {}: {}", key, e)))?;
        if raw.contains('<') {
            return Err(ParseError::Malformed(format!(
                "'<' in value of attribute {}",
                key
            )));
        }
        let value = unescape(&normalize_attribute(raw))
            .map_err(|e| ParseError::Malformed(format!("attribute {}: {}", key, e)))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Accepts the five predefined entities and character references to legal
/// characters; no DTD is read, so every other entity is undefined.
fn check_reference(reference: &BytesRef<'_>) -> Result<(), ParseError> {
    let name = std::str::from_utf8(&reference[..])
        .map_err(|e| ParseError::Malformed(format!("invalid UTF-8 in reference: {}", e)))?;
    let known = match name.strip_prefix('#') {
        Some(number) => parse_char_reference(number).is_some_and(is_xml_char),
        None => matches!(name, "lt" | "gt" | "amp" | "apos" | "quot"),
    };
    if !known {
        return Err(ParseError::Malformed(format!("undefined entity &{};", name)));
    }
    Ok(())
}

fn parse_char_reference(number: &str) -> Option<char> {
    let code = match number.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Element and attribute names must follow the XML `Name` production.
fn check_name(name: &str) -> Result<(), ParseError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char);
    if !valid {
        return Err(ParseError::Malformed(format!("invalid name '{}'", name)));
    }
    Ok(())
}

/// quick-xml tolerates `a="1"b="2"`; XML requires whitespace after each
/// quoted attribute value. `raw` is the tag content between `<` and `>`.
fn check_attribute_spacing(name: &str, raw: &[u8]) -> Result<(), ParseError> {
    let mut quote: Option<u8> = None;
    for (index, &byte) in raw.iter().enumerate() {
        match quote {
            Some(open) if byte == open => {
                quote = None;
                let next = raw.get(index + 1).copied();
                if !matches!(next, None | Some(b' ' | b'\t' | b'\r' | b'\n' | b'/')) {
                    return Err(ParseError::Malformed(format!(
                        "missing whitespace between attributes of <{}>",
                        name
                    )));
                }
            }
            Some(_) => {}
            None if byte == b'"' || byte == b'\'' => quote = Some(byte),
            None => {}
        }
    }
    Ok(())
}

fn decode_name(bytes: &[u8]) -> Result<String, ParseError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| ParseError::Malformed(format!("invalid UTF-8 in name: {}", e)))
}

/// Attribute-value normalization of literal whitespace: CRLF, CR, LF and TAB
/// each become a single space. Character references are untouched here and
/// survive as their characters after unescaping.
fn normalize_attribute(raw: &str) -> String {
    raw.replace("\r\n", " ")
        .replace(['\r', '\n', '\t'], " ")
}
