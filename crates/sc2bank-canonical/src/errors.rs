use thiserror::Error;

/// Errors raised while turning markup into a [`Bank`](crate::Bank).
#[derive(Error, Debug)]
pub enum ParseError {
    /// I/O error while reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Error from the underlying quick-xml reader.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Malformed attribute (duplicate name, missing quotes, ...).
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    /// Markup that is not a well-formed single-rooted document.
    #[error("malformed document: {0}")]
    Malformed(String),
    /// The document root is not `<Bank>`.
    #[error("invalid root tag: {0}")]
    InvalidRoot(String),
    /// A required attribute is absent.
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Element that lacks the attribute.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },
    /// A required child element is absent.
    #[error("<{parent} name=\"{name}\"> has no <{element}> child")]
    MissingElement {
        /// Parent element tag.
        parent: &'static str,
        /// Parent's `name` attribute.
        name: String,
        /// Missing child tag.
        element: &'static str,
    },
    /// A child element that must be unique appears more than once.
    #[error("<{parent} name=\"{name}\"> has {count} <{element}> children, expected one")]
    DuplicateElement {
        /// Parent element tag.
        parent: &'static str,
        /// Parent's `name` attribute.
        name: String,
        /// Repeated child tag.
        element: &'static str,
        /// Number of occurrences.
        count: usize,
    },
    /// Declared or detected character encoding this parser cannot decode.
    #[error("unsupported document encoding: {0}")]
    UnsupportedEncoding(String),
    /// A `Value` element without exactly one attribute.
    #[error("unknown value type in {element}")]
    UnknownValueType {
        /// Rendered offending element.
        element: String,
    },
}

/// Errors raised by the verification driver.
#[derive(Error, Debug)]
pub enum BankError {
    /// The document could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Not every identity field was supplied or derivable.
    #[error("cannot resolve identity: missing {}", .fields.join(", "))]
    MissingIdentity {
        /// Names of the unresolved fields.
        fields: Vec<&'static str>,
    },
}
