//! Canonical stream construction and signing.
//!
//! The signed text is `author_id || user_id || name`, followed by every
//! section in name order and, within each, every key in name order as
//! `name || "Value" || value_type || value`. Nothing is delimited. Both sorts
//! are stable, so equal names keep their document order. The signature is the
//! uppercase hex SHA-1 of the UTF-8 bytes.

use sha1::{Digest as Sha1Digest, Sha1};

use crate::digest::Signature;
use crate::identity::Identity;
use crate::model::{Bank, Named};

/// Literal emitted between a key's name and its value type.
const VALUE_TOKEN: &str = "Value";

/// Builds the exact text that is hashed for `identity` and `bank`.
pub fn canonical_string(identity: &Identity, bank: &Bank) -> String {
    canonical_parts(&identity.author_id, &identity.user_id, &identity.name, bank)
}

/// [`canonical_string`] as UTF-8 bytes.
pub fn canonical_bytes(identity: &Identity, bank: &Bank) -> Vec<u8> {
    canonical_string(identity, bank).into_bytes()
}

/// Computes the signature of `bank` for the given identity fields.
///
/// Pure: the result depends only on the arguments, and not on the document
/// order of sections or keys.
///
/// # Example
///
/// ```rust
/// use sc2bank_canonical::{sign, Bank, Key, Section};
///
/// let bank = Bank::new(vec![
///     Section::new("lllllIIlIllIIllI", vec![Key::new("lllllllIlIllIIII", "int", "5")]),
///     Section::new("IIlIlIIlllIIII", vec![Key::new("IllIIIIIlIIIII", "int", "780000")]),
/// ]);
/// let signature = sign("1-S2-1-4337146", "1-S2-1-4253458", "llIlIIlIlIllIllI", &bank);
/// assert_eq!(signature, "3ECC1CCD9762908DE09D322235D5ED4D13CD1C53");
/// ```
pub fn sign(author_id: &str, user_id: &str, name: &str, bank: &Bank) -> Signature {
    let canonical = canonical_parts(author_id, user_id, name, bank);
    let digest = Sha1::digest(canonical.as_bytes());
    tracing::debug!(bytes = canonical.len(), "signed canonical stream");
    Signature::from_digest(digest.as_slice())
}

/// [`sign`] with a resolved [`Identity`].
pub fn sign_identity(identity: &Identity, bank: &Bank) -> Signature {
    sign(&identity.author_id, &identity.user_id, &identity.name, bank)
}

fn canonical_parts(author_id: &str, user_id: &str, name: &str, bank: &Bank) -> String {
    let mut out = String::with_capacity(author_id.len() + user_id.len() + name.len());
    out.push_str(author_id);
    out.push_str(user_id);
    out.push_str(name);

    for section in sorted_by_name(&bank.sections) {
        out.push_str(&section.name);
        for key in sorted_by_name(&section.keys) {
            out.push_str(&key.name);
            out.push_str(VALUE_TOKEN);
            out.push_str(&key.value_type);
            out.push_str(&key.value);
        }
    }
    out
}

/// Stable sort by name only; ties keep input order.
fn sorted_by_name<T: Named>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));
    sorted
}
