use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::QuoteRequest;

/// Read a quote request from disk. `.json` files are parsed as JSON,
/// anything else as YAML.
pub fn load_request(path: &Path) -> Result<QuoteRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let request = if is_json {
        serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse request: invalid JSON in {}", path.display())
        })?
    } else {
        serde_saphyr::from_str(&content).with_context(|| {
            format!("Failed to parse request: invalid YAML in {}", path.display())
        })?
    };
    Ok(request)
}
