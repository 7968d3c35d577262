//! Subcommand implementations.

use clap::Args;
use sc2bank_canonical::{decode_document, BankSource, PartialIdentity};
use std::io::{self, Read};

use crate::path;

pub mod canonicalize;
pub mod inspect;
pub mod sign;
pub mod verify;

/// Explicit identity overrides shared by the signing commands.
#[derive(Args, Debug)]
pub struct IdentityArgs {
    /// Author ID to sign the SC2Bank with
    #[arg(long = "authorid", short = 'a')]
    pub author_id: Option<String>,
    /// User ID to sign the SC2Bank with
    #[arg(long = "userid", short = 'u')]
    pub user_id: Option<String>,
    /// SC2Bank name to sign with (usually the file name without extension)
    #[arg(long = "bankname", short = 'b')]
    pub bank_name: Option<String>,
}

impl IdentityArgs {
    pub fn into_partial(self) -> PartialIdentity {
        PartialIdentity {
            author_id: self.author_id,
            user_id: self.user_id,
            name: self.bank_name,
        }
    }
}

/// Bad invocation; reported with exit code 2.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// Turns the positional argument into a source. `-` reads stdin, which has no
/// path to derive identity from.
pub fn open_source(
    input: &str,
    explicit: &PartialIdentity,
) -> Result<BankSource, Box<dyn std::error::Error>> {
    if input == "-" {
        if !explicit.is_complete() {
            return Err(UsageError(
                "Must specify --userid, --authorid, and --bankname to sign SC2Bank from stdin."
                    .to_string(),
            )
            .into());
        }
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        return Ok(BankSource::Text(decode_document(&buffer)?));
    }

    Ok(BankSource::File(path::validate_bank_path(input)?))
}
