//! Bulk TAC database preprocessing
//!
//! Flattens the master TAC file
//! `{ "brands": { "<brand>": { "models": [ { "<model>": { "tacs": [..] } } ] } } }`
//! into `{ "<tac>": "<brand> <model>" }`. A TAC listed more than once keeps
//! the last name seen.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Flatten a parsed master file, keeping source order
pub fn build_tac_lite(master: &Value) -> Map<String, Value> {
    let mut lite = Map::new();

    let Some(brands) = master.get("brands").and_then(Value::as_object) else {
        return lite;
    };

    for (brand, entry) in brands {
        let Some(models) = entry.get("models").and_then(Value::as_array) else {
            continue;
        };
        for model_obj in models.iter().filter_map(Value::as_object) {
            // one model per object
            let Some((model, info)) = model_obj.iter().next() else {
                continue;
            };
            let Some(tacs) = info.get("tacs").and_then(Value::as_array) else {
                continue;
            };
            let name = format!("{} {}", brand, model);
            for tac in tacs {
                let tac = match tac {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => continue,
                };
                lite.insert(tac, Value::String(name.clone()));
            }
        }
    }

    lite
}

/// Read the master file at `input`, write the flat map to `output`
///
/// Returns the number of TACs written.
pub async fn process_tac_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<usize> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read TAC master file {}", input.display()))?;
    let master: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse TAC master file {}", input.display()))?;

    let lite = build_tac_lite(&master);
    let count = lite.len();

    let json = serde_json::to_string(&lite).context("Failed to serialize TAC database")?;
    tokio::fs::write(output, json)
        .await
        .with_context(|| format!("Failed to write TAC database {}", output.display()))?;

    tracing::info!("Processed {} TACs into {}", count, output.display());
    Ok(count)
}
