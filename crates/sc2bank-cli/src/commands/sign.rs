//! Sign command implementation.
//!
//! Rewrites the raw text rather than re-serializing the model, so everything
//! except the signature stays byte-for-byte identical.

use std::path::PathBuf;

use crate::commands::{IdentityArgs, UsageError};
use crate::path;
use crate::rewrite;
use sc2bank_canonical::{parse_str, sign_identity, BankSource};

pub fn run(
    sc2bank: String,
    identity: IdentityArgs,
    output: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if sc2bank == "-" {
        return Err(UsageError("sign needs a file path, not stdin".to_string()).into());
    }
    let bank_path = path::validate_bank_path(&sc2bank)?;
    let source = BankSource::File(bank_path.clone());
    let identity = source.resolve_identity(identity.into_partial())?;

    let contents = std::fs::read_to_string(&bank_path)
        .map_err(|e| format!("Failed to read file {}: {}", sc2bank, e))?;
    let parsed = parse_str(&contents)?;
    let computed = sign_identity(&identity, &parsed.bank);

    let recorded = parsed
        .signature
        .ok_or("document has no recorded signature to replace")?;
    let in_place = output.is_none();
    let target = output.map(PathBuf::from).unwrap_or(bank_path);

    if in_place && computed == recorded.as_str() {
        println!("Signature already up to date: {}", computed);
        return Ok(());
    }

    let updated = rewrite::replace_signature(&contents, &recorded, computed.as_str())?;
    std::fs::write(&target, updated)
        .map_err(|e| format!("Failed to write file {}: {}", target.display(), e))?;
    tracing::info!(path = %target.display(), old = %recorded, new = %computed, "bank re-signed");

    println!("Old signature: {}", recorded);
    println!("New signature: {}", computed);
    Ok(())
}
