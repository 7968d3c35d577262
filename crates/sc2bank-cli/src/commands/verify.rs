//! Verify command implementation.

use crate::commands::{open_source, IdentityArgs};
use crate::output;
use sc2bank_canonical::sign_source;

pub fn run(
    sc2bank: String,
    identity: IdentityArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let explicit = identity.into_partial();
    let source = open_source(&sc2bank, &explicit)?;
    let report = sign_source(&source, explicit)?;

    if json {
        println!("{}", output::format_report_json(&report)?);
    } else {
        print!("{}", output::format_report(&report));
    }

    if !report.is_match() {
        tracing::info!(
            computed = %report.computed,
            recorded = ?report.recorded,
            "signature mismatch"
        );
        std::process::exit(1);
    }

    Ok(())
}
