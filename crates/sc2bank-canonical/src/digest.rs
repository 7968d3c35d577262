use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static SIGNATURE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-F]{40}$").expect("invalid regex"));

/// Text that is not a well-formed signature.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a 40 character uppercase hex SHA-1 digest")]
pub struct InvalidSignature(pub String);

/// SHA-1 digest rendered as 40 uppercase hexadecimal characters.
///
/// This is the exact text stored in a bank's `<Signature value="..."/>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Parses a validated signature string.
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidSignature> {
        let value = value.into();
        if !SIGNATURE_PATTERN.is_match(&value) {
            return Err(InvalidSignature(value));
        }
        Ok(Self(value))
    }

    /// Renders raw digest bytes.
    pub(crate) fn from_digest(bytes: &[u8]) -> Self {
        Self(hex::encode_upper(bytes))
    }

    /// Returns the hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Signature {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Signature {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
