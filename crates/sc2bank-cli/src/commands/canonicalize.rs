//! Canonicalize command implementation.

use crate::commands::{open_source, IdentityArgs};
use sc2bank_canonical::canonical_string;

pub fn run(sc2bank: String, identity: IdentityArgs) -> Result<(), Box<dyn std::error::Error>> {
    let explicit = identity.into_partial();
    let source = open_source(&sc2bank, &explicit)?;
    let identity = source.resolve_identity(explicit)?;
    let parsed = source.parse()?;

    println!("{}", canonical_string(&identity, &parsed.bank));
    Ok(())
}
