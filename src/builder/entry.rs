//! Aggregate entry generation
//!
//! The entry module exports the package version plus every transpiled
//! script under its base name.

use serde_json::Value;

use crate::transform::umd_wrap;
use crate::utils::{has_script_extension, strip_script_extension, LINE_ENDING};

/// File name of the aggregate entry in the output directory
pub const ENTRY_FILE_NAME: &str = "index.js";

/// Unwrapped entry body
///
/// `names` are source file names in build order; only those already
/// ending in `.js` get an export.
pub fn entry_body(version: Option<&Value>, names: &[String]) -> String {
    let version = version.map_or_else(|| "undefined".to_string(), Value::to_string);

    let mut lines = vec![
        "module.exports =".to_string(),
        "{".to_string(),
        format!("\t\"version\": {}", version),
    ];

    for name in names.iter().filter(|n| has_script_extension(n)) {
        let base = strip_script_extension(name);
        if let Some(last) = lines.last_mut() {
            last.push(',');
        }
        lines.push(format!(
            "\t{}: require({})",
            Value::from(base),
            Value::from(format!("./{}", base))
        ));
    }

    lines.push("};".to_string());
    lines.join(LINE_ENDING)
}

/// Complete, wrapped entry module
///
/// A header is emitted only when it is non-empty.
pub fn generate_entry(header: Option<&str>, version: Option<&Value>, names: &[String]) -> String {
    umd_wrap(&entry_body(version, names), header)
}
