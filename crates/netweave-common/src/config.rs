//! Configuration model for the composer.
//!
//! The composer itself reads no files or environment variables; the CLI
//! builds a [`ComposerConfig`] from flags and hands it over.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Settings that shape every response the composer produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposerConfig {
    /// Time-to-live attached to every response, in seconds.
    pub ttl_secs: u64,
    /// Region substituted when the composite leaves it empty.
    pub default_region: String,
    /// Provider config substituted when the composite leaves it empty.
    pub default_provider_config: String,
}

impl ComposerConfig {
    /// Returns the response time-to-live as a [`Duration`].
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            ttl_secs: constants::DEFAULT_TTL_SECS,
            default_region: constants::DEFAULT_REGION.into(),
            default_provider_config: constants::DEFAULT_PROVIDER_CONFIG.into(),
        }
    }
}
