//! Output formatting utilities.

use sc2bank_canonical::{PartialIdentity, SignatureReport};
use serde_json::json;

const NO_SIGNATURE: &str = "(No signature in XML document.)";
const UNKNOWN: &str = "(unknown)";

/// Formats a report the way `verify` prints it.
pub fn format_report(report: &SignatureReport) -> String {
    let mut out = format!(
        "Calculated signature: {}\nRecorded signature:   {}\n",
        report.computed,
        report.recorded.as_deref().unwrap_or(NO_SIGNATURE)
    );
    if !report.is_match() {
        out.push_str("Signatures are NOT equal!\n");
    }
    out
}

/// Formats a report as pretty JSON.
pub fn format_report_json(report: &SignatureReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "computed": report.computed,
        "recorded": report.recorded,
        "match": report.is_match(),
    }))
}

/// Formats derived identity fields as aligned lines.
pub fn format_identity(info: &PartialIdentity) -> String {
    format!(
        "{:<10} {}\n{:<10} {}\n{:<10} {}\n",
        "AUTHOR_ID",
        info.author_id.as_deref().unwrap_or(UNKNOWN),
        "USER_ID",
        info.user_id.as_deref().unwrap_or(UNKNOWN),
        "NAME",
        info.name.as_deref().unwrap_or(UNKNOWN),
    )
}
