//! Parsing, canonicalization and signing primitives for SC2Bank documents.
//!
//! An SC2Bank is an XML save file (`<Bank>` root, `Section`/`Key`/`Value`
//! elements) carrying a SHA-1 signature over its sorted content plus three
//! identity strings: the author id, the user id and the bank name. This crate
//! recomputes that signature so callers can detect hand-edited banks.
//!
//! ## Quick Start
//!
//! ```rust
//! use sc2bank_canonical::{sign_str, PartialIdentity};
//!
//! let xml = r#"<Bank version="1">
//!     <Section name="lllllIIlIllIIllI">
//!         <Key name="lllllllIlIllIIII"><Value int="5"/></Key>
//!     </Section>
//!     <Section name="IIlIlIIlllIIII">
//!         <Key name="IllIIIIIlIIIII"><Value int="780000"/></Key>
//!     </Section>
//!     <Signature value="3ECC1CCD9762908DE09D322235D5ED4D13CD1C53"/>
//! </Bank>"#;
//!
//! let identity = PartialIdentity::new("1-S2-1-4337146", "1-S2-1-4253458", "llIlIIlIlIllIllI");
//! let report = sign_str(xml, identity)?;
//! assert!(report.is_match());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`Bank`] - parsed document model
//! - [`Signature`] - 40 character uppercase hex digest
//! - [`PartialIdentity`] / [`Identity`] - signing identity before and after resolution
//! - [`SignatureReport`] - computed vs. recorded signature
#![deny(missing_docs)]

/// Canonical stream construction and signing.
pub mod canonicalizer;
/// Signature digest newtype.
pub mod digest;
/// Error types for parsing and verification.
pub mod errors;
/// Identity triple and path inspection.
pub mod identity;
/// Minimal XML element tree used by the parser.
pub mod markup;
/// In-memory document model.
pub mod model;
/// SC2Bank document parser.
pub mod parser;
/// Parse + sign orchestration over files, strings and readers.
pub mod verification;

pub use canonicalizer::{canonical_bytes, canonical_string, sign, sign_identity};
pub use digest::{InvalidSignature, Signature};
pub use errors::{BankError, ParseError};
pub use identity::{inspect_path, Identity, PartialIdentity};
pub use model::{Bank, Key, Section};
pub use parser::{decode_document, parse_file, parse_reader, parse_str, ParsedBank};
pub use verification::{sign_file, sign_reader, sign_source, sign_str, BankSource, SignatureReport};
