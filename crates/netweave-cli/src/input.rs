//! Loading JSON or YAML documents from files or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Path that selects stdin instead of a file.
pub const STDIN: &str = "-";

/// Reads `path` (or stdin for `-`) and decodes it as JSON or YAML.
///
/// Files ending in `.json`, and any input whose first non-blank character
/// is `{`, are decoded as JSON; everything else as YAML.
///
/// # Errors
///
/// Returns an error if the input cannot be read or decoded.
pub fn load<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = read_source(path)?;
    decode(path, &content)
}

fn read_source(path: &str) -> anyhow::Result<String> {
    if path == STDIN {
        let mut content = String::new();
        let _ = std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}

fn decode<T: DeserializeOwned>(path: &str, content: &str) -> anyhow::Result<T> {
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        || content.trim_start().starts_with('{');

    if is_json {
        serde_json::from_str(content).with_context(|| format!("{path} is not valid JSON"))
    } else {
        serde_yaml::from_str(content).with_context(|| format!("{path} is not valid YAML"))
    }
}
