//! Parse + sign orchestration.
//!
//! The driver resolves identity, parses the source and signs it, returning the
//! computed and recorded signatures side by side. Deciding what a mismatch
//! means is left to the caller.

use std::io::Read;
use std::path::PathBuf;

use serde::Serialize;

use crate::canonicalizer::sign_identity;
use crate::digest::Signature;
use crate::errors::BankError;
use crate::identity::{inspect_path, Identity, PartialIdentity};
use crate::parser::{parse_file, parse_reader, parse_str, ParsedBank};

/// Where a bank comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    /// A bank file; its path can supply missing identity fields.
    File(PathBuf),
    /// In-memory markup; identity must be supplied in full.
    Text(String),
}

impl BankSource {
    /// Resolves the signing identity: explicit fields win, and file sources
    /// fill the rest from [`inspect_path`].
    pub fn resolve_identity(&self, explicit: PartialIdentity) -> Result<Identity, BankError> {
        let merged = match self {
            BankSource::File(path) if !explicit.is_complete() => explicit.or(inspect_path(path)),
            _ => explicit,
        };
        merged.resolve()
    }

    /// Parses the source.
    pub fn parse(&self) -> Result<ParsedBank, BankError> {
        let parsed = match self {
            BankSource::File(path) => parse_file(path)?,
            BankSource::Text(text) => parse_str(text)?,
        };
        Ok(parsed)
    }
}

/// Computed signature alongside the one recorded in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureReport {
    /// Signature computed from content and identity.
    pub computed: Signature,
    /// `<Signature value>` from the document, if any.
    pub recorded: Option<String>,
}

impl SignatureReport {
    /// True when a signature is recorded and equals the computed one.
    pub fn is_match(&self) -> bool {
        self.recorded.as_deref() == Some(self.computed.as_str())
    }
}

/// Signs a bank from any source.
///
/// # Errors
///
/// Returns [`BankError::MissingIdentity`] before touching the source when the
/// identity cannot be completed, and [`BankError::Parse`] for any parse
/// failure.
pub fn sign_source(
    source: &BankSource,
    explicit: PartialIdentity,
) -> Result<SignatureReport, BankError> {
    let identity = source.resolve_identity(explicit)?;
    let parsed = source.parse()?;
    Ok(report(&identity, parsed))
}

/// Signs a bank file, deriving missing identity fields from its path.
pub fn sign_file(
    path: impl Into<PathBuf>,
    explicit: PartialIdentity,
) -> Result<SignatureReport, BankError> {
    sign_source(&BankSource::File(path.into()), explicit)
}

/// Signs in-memory markup. All identity fields are required.
pub fn sign_str(text: &str, explicit: PartialIdentity) -> Result<SignatureReport, BankError> {
    sign_source(&BankSource::Text(text.to_owned()), explicit)
}

/// Signs markup read from a stream. All identity fields are required.
pub fn sign_reader<R: Read>(
    reader: R,
    explicit: PartialIdentity,
) -> Result<SignatureReport, BankError> {
    let identity = explicit.resolve()?;
    let parsed = parse_reader(reader)?;
    Ok(report(&identity, parsed))
}

fn report(identity: &Identity, parsed: ParsedBank) -> SignatureReport {
    let computed = sign_identity(identity, &parsed.bank);
    tracing::debug!(
        computed = %computed,
        recorded = ?parsed.signature,
        "bank signed"
    );
    SignatureReport {
        computed,
        recorded: parsed.signature,
    }
}
