//! Formatted output helpers for CLI commands.

use clap::ValueEnum;
use netweave_compose::function::DesiredResources;
use serde::Serialize;

/// Format of documents written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML; resource lists become a multi-document stream.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Serializes a single document.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn document<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(value)?),
    })
}

/// Serializes desired resources.
///
/// YAML output is a stream with one document per resource body, in name
/// order. JSON output is an object keyed by resource name.
///
/// # Errors
///
/// Returns an error if a resource cannot be serialized.
pub fn resources(desired: &DesiredResources, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Yaml => {
            let mut out = String::new();
            for resource in desired.values() {
                out.push_str("---\n");
                out.push_str(&serde_yaml::to_string(&resource.resource)?);
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let bodies: serde_json::Map<String, serde_json::Value> = desired
                .iter()
                .map(|(name, r)| (name.to_string(), serde_json::Value::Object(r.resource.clone())))
                .collect();
            document(&bodies, format)
        }
    }
}
