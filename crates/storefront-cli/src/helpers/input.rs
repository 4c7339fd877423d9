//! Record input for commands that take JSON.

use std::io::Read;

use crate::errors::CliError;

/// Read a record's JSON from the argument, or from stdin when it is `-`.
pub fn read_record_json<R: serde::de::DeserializeOwned>(arg: &str) -> anyhow::Result<R> {
    let text = if arg == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        buffer
    } else {
        arg.to_string()
    };

    serde_json::from_str(&text).map_err(|e| {
        CliError::invalid_input_with_hint(
            format!("Invalid record JSON: {}", e),
            "Hint: Pass one JSON object with the same fields as the snapshot records.",
        )
        .into()
    })
}
