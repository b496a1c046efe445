//! Unified error types for the netweave workspace.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum NetweaveError {
    /// The request carries no observed composite resource.
    #[error("request has no observed composite resource")]
    MissingComposite,

    /// A synthesized unit could not be converted to its wire representation.
    #[error("cannot convert {kind} \"{name}\" to a desired composed resource: {source}")]
    Conversion {
        /// Name of the unit that failed to convert.
        name: String,
        /// Wire kind of the unit (e.g. `VPC`).
        kind: &'static str,
        /// Underlying serialization error.
        source: serde_json::Error,
    },

    /// A synthesized unit serialized to something other than an object.
    #[error("{kind} \"{name}\" did not serialize to an object")]
    NotAnObject {
        /// Name of the offending unit.
        name: String,
        /// Wire kind of the unit.
        kind: &'static str,
    },

    /// A configuration or input value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, NetweaveError>;
