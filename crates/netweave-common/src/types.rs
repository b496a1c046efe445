//! Domain primitive types used across the netweave workspace.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Correlation labels attached to a resource, ordered by key.
pub type Labels = BTreeMap<String, String>;

/// Name under which a resource is stored in the desired-resource collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    /// Creates a resource name from a string value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derives the name of the `index`-th unit of `kind` in topology `id`.
    ///
    /// The result is `<prefix>-<id>-<index>`, so the same input always
    /// produces the same name and distinct indices never collide.
    #[must_use]
    pub fn for_unit(kind: UnitKind, id: &str, index: u64) -> Self {
        Self(format!("{}-{id}-{index}", kind.name_prefix()))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Kind of unit the composer synthesizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// A VPC-like network unit.
    NetworkUnit,
    /// An internet gateway attached to a network unit.
    GatewayUnit,
}

impl UnitKind {
    /// Prefix used when deriving unit names.
    #[must_use]
    pub const fn name_prefix(self) -> &'static str {
        match self {
            Self::NetworkUnit => "vpc",
            Self::GatewayUnit => "gateway",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkUnit => write!(f, "network unit"),
            Self::GatewayUnit => write!(f, "gateway unit"),
        }
    }
}
