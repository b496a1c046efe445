//! Request and response model of a composition function invocation.
//!
//! Field names follow the protobuf JSON mapping of the function protocol,
//! so a request captured from a running control plane decodes as is.
//! Every field defaults when absent.

use std::collections::BTreeMap;
use std::time::Duration;

use netweave_common::types::ResourceName;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Desired composed resources keyed by name.
pub type DesiredResources = BTreeMap<ResourceName, Resource>;

/// A single invocation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunFunctionRequest {
    /// Request metadata.
    pub meta: RequestMeta,
    /// State observed by the runtime.
    pub observed: State,
    /// Desired state accumulated by earlier functions in the pipeline.
    pub desired: State,
    /// Optional function input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// Opaque context passed between functions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// Metadata attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestMeta {
    /// Opaque tag identifying the request; echoed in the response.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

/// Observed or desired state: a composite plus composed resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    /// The composite resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite: Option<Resource>,
    /// Composed resources keyed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: DesiredResources,
}

/// A resource document together with its readiness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    /// The resource body (`apiVersion`, `kind`, `metadata`, `spec`, ...).
    pub resource: Map<String, Value>,
    /// Readiness reported for the resource.
    #[serde(skip_serializing_if = "Ready::is_unspecified")]
    pub ready: Ready,
}

impl Resource {
    /// Wraps a resource body with unspecified readiness.
    #[must_use]
    pub fn new(resource: Map<String, Value>) -> Self {
        Self {
            resource,
            ready: Ready::Unspecified,
        }
    }
}

/// Readiness of a composed resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ready {
    /// Readiness is left to the runtime.
    #[default]
    #[serde(rename = "READY_UNSPECIFIED")]
    Unspecified,
    /// The resource is ready.
    #[serde(rename = "READY_TRUE")]
    True,
    /// The resource is not ready.
    #[serde(rename = "READY_FALSE")]
    False,
}

impl Ready {
    const fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }
}

/// The response to a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunFunctionResponse {
    /// Response metadata.
    pub meta: ResponseMeta,
    /// Desired state after this function ran.
    pub desired: State,
    /// Results reported by the function.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<FnResult>,
    /// Context handed to the next function.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl RunFunctionResponse {
    /// Returns `true` if any result is fatal.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Fatal)
    }

    /// Returns the message of the first fatal result, if any.
    #[must_use]
    pub fn fatal_message(&self) -> Option<&str> {
        self.results
            .iter()
            .find(|r| r.severity == Severity::Fatal)
            .map(|r| r.message.as_str())
    }
}

/// Metadata attached to a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMeta {
    /// Tag copied from the request.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// How long the runtime may cache this response.
    #[serde(skip_serializing_if = "Option::is_none", with = "duration_string")]
    pub ttl: Option<Duration>,
}

/// A result reported by the function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FnResult {
    /// Severity of the result.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

/// Severity of a function result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// The invocation failed; its output must not be used.
    #[serde(rename = "SEVERITY_FATAL")]
    Fatal,
    /// The invocation succeeded with a caveat.
    #[serde(rename = "SEVERITY_WARNING")]
    Warning,
    /// Informational.
    #[serde(rename = "SEVERITY_NORMAL")]
    Normal,
}

/// Protobuf JSON duration encoding: decimal seconds with an `s` suffix.
mod duration_string {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(ttl: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match ttl {
            Some(d) if d.subsec_nanos() == 0 => s.serialize_str(&format!("{}s", d.as_secs())),
            Some(d) => {
                let frac = format!("{:09}", d.subsec_nanos());
                s.serialize_str(&format!("{}.{}s", d.as_secs(), frac.trim_end_matches('0')))
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        let secs = raw
            .strip_suffix('s')
            .ok_or_else(|| de::Error::custom(format!("duration {raw:?} lacks the `s` suffix")))?;
        let secs: f64 = secs
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid duration: {raw:?}")))?;
        Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("duration out of range: {raw:?}")))
    }
}
