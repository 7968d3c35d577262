//! Exact, single-occurrence signature substitution in raw bank text.

use thiserror::Error;

/// Why a signature could not be swapped in.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewriteError {
    /// The recorded signature is empty, so there is nothing to search for.
    #[error("recorded signature is empty")]
    EmptySignature,
    /// The recorded signature text is absent from the document.
    #[error("signature {0} does not occur in the document")]
    NotFound(String),
    /// Replacing would require guessing which occurrence is the signature.
    #[error("signature {signature} occurs {count} times in the document, not replacing")]
    Ambiguous {
        /// Recorded signature.
        signature: String,
        /// Number of occurrences found.
        count: usize,
    },
}

/// Replaces the only occurrence of `old` with `new`.
pub fn replace_signature(contents: &str, old: &str, new: &str) -> Result<String, RewriteError> {
    if old.is_empty() {
        return Err(RewriteError::EmptySignature);
    }
    match contents.matches(old).count() {
        0 => Err(RewriteError::NotFound(old.to_string())),
        1 => Ok(contents.replacen(old, new, 1)),
        count => Err(RewriteError::Ambiguous {
            signature: old.to_string(),
            count,
        }),
    }
}
