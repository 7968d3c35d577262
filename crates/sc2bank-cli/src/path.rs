//! Input path validation.

use std::path::PathBuf;

use crate::commands::UsageError;

/// Checks that `input` names an existing regular file.
pub fn validate_bank_path(input: &str) -> Result<PathBuf, UsageError> {
    let path = PathBuf::from(input);
    if !path.is_file() {
        return Err(UsageError(format!("\"{}\" is not a file.", input)));
    }
    Ok(path)
}
