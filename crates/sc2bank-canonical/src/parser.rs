//! SC2Bank document parser.
//!
//! Builds a [`Bank`] from `<Bank>` markup. Only the shape the signature
//! depends on is checked; unknown elements are ignored.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::bytes::Regex;
use serde::Serialize;

use crate::errors::ParseError;
use crate::markup::{self, Element};
use crate::model::{Bank, Key, Section};

const BANK_TAG: &str = "Bank";
const SECTION_TAG: &str = "Section";
const KEY_TAG: &str = "Key";
const VALUE_TAG: &str = "Value";
const SIGNATURE_TAG: &str = "Signature";

static ENCODING_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z][A-Za-z0-9._-]*)["']"#)
        .expect("invalid regex")
});

/// A parsed bank plus the signature recorded in the document, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedBank {
    /// Document content.
    pub bank: Bank,
    /// `value` attribute of the top-level `<Signature>` element, verbatim.
    pub signature: Option<String>,
}

/// Parses bank markup from a string.
///
/// # Errors
///
/// Returns [`ParseError::InvalidRoot`] when the root is not `<Bank>`,
/// [`ParseError::UnknownValueType`] when a `<Value>` does not carry exactly
/// one attribute, and markup errors for anything that is not well-formed.
pub fn parse_str(text: &str) -> Result<ParsedBank, ParseError> {
    let root = markup::parse_document(text)?;
    if root.name != BANK_TAG {
        return Err(ParseError::InvalidRoot(root.name));
    }

    let sections = root
        .children_named(SECTION_TAG)
        .map(parse_section)
        .collect::<Result<Vec<_>, _>>()?;

    let signature = root
        .children_named(SIGNATURE_TAG)
        .next()
        .and_then(|element| element.attribute("value"))
        .map(str::to_owned);

    let bank = Bank::new(sections);
    tracing::debug!(
        sections = bank.sections.len(),
        keys = bank.key_count(),
        signed = signature.is_some(),
        "parsed bank"
    );
    Ok(ParsedBank { bank, signature })
}

/// Reads a stream to the end and parses it.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<ParsedBank, ParseError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_str(&decode_document(&bytes)?)
}

/// Reads and parses a bank file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedBank, ParseError> {
    let bytes = std::fs::read(path)?;
    parse_str(&decode_document(&bytes)?)
}

/// Decodes raw document bytes to text.
///
/// UTF-16 is recognized by its byte order mark or by the byte pattern of a
/// leading `<?`. Otherwise the encoding named in the XML declaration is
/// used: UTF-8 (the default), US-ASCII, or ISO-8859-1 / Latin-1.
pub fn decode_document(bytes: &[u8]) -> Result<String, ParseError> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => return decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => return decode_utf16(rest, u16::from_be_bytes),
        [b'<', 0, b'?', 0, ..] => return decode_utf16(bytes, u16::from_le_bytes),
        [0, b'<', 0, b'?', ..] => return decode_utf16(bytes, u16::from_be_bytes),
        _ => {}
    }

    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let declared = ENCODING_DECL
        .captures(bytes)
        .map(|captures| String::from_utf8_lossy(&captures[1]).to_ascii_lowercase());
    match declared.as_deref() {
        None | Some("utf-8" | "utf8") => String::from_utf8(bytes.to_vec())
            .map_err(|e| ParseError::Malformed(format!("invalid UTF-8: {}", e))),
        Some("us-ascii" | "ascii") if !bytes.is_ascii() => Err(ParseError::Malformed(
            "non-ASCII byte in US-ASCII document".to_string(),
        )),
        Some("us-ascii" | "ascii") => Ok(String::from_utf8_lossy(bytes).into_owned()),
        Some("iso-8859-1" | "latin-1" | "latin1") => {
            Ok(bytes.iter().map(|&byte| char::from(byte)).collect())
        }
        Some(other) => Err(ParseError::UnsupportedEncoding(other.to_string())),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, ParseError> {
    if bytes.len() % 2 != 0 {
        return Err(ParseError::Malformed(
            "odd number of bytes in UTF-16 document".to_string(),
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|e| ParseError::Malformed(format!("invalid UTF-16: {}", e)))
}

fn parse_section(element: &Element) -> Result<Section, ParseError> {
    let name = required_attribute(element, SECTION_TAG, "name")?;
    let keys = element
        .children_named(KEY_TAG)
        .map(parse_key)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Section::new(name, keys))
}

fn parse_key(element: &Element) -> Result<Key, ParseError> {
    let name = required_attribute(element, KEY_TAG, "name")?;

    let values: Vec<&Element> = element.children_named(VALUE_TAG).collect();
    let value = match values.as_slice() {
        [value] => *value,
        [] => {
            return Err(ParseError::MissingElement {
                parent: KEY_TAG,
                name: name.to_owned(),
                element: VALUE_TAG,
            })
        }
        _ => {
            return Err(ParseError::DuplicateElement {
                parent: KEY_TAG,
                name: name.to_owned(),
                element: VALUE_TAG,
                count: values.len(),
            })
        }
    };

    // The type is whatever the single attribute is called, not a fixed set.
    match value.attributes.as_slice() {
        [(value_type, text)] => Ok(Key::new(name, value_type.as_str(), text.as_str())),
        _ => Err(ParseError::UnknownValueType {
            element: value.render(),
        }),
    }
}

fn required_attribute<'a>(
    element: &'a Element,
    tag: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ParseError> {
    element
        .attribute(attribute)
        .ok_or(ParseError::MissingAttribute {
            element: tag,
            attribute,
        })
}
