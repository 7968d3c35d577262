//! Inspect command implementation.

use crate::output;
use sc2bank_canonical::inspect_path;

pub fn run(path: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let info = inspect_path(&path);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print!("{}", output::format_identity(&info));
    }

    Ok(())
}
