//! Extraction of the topology declaration from the observed composite.
//!
//! The composite's `spec` object is decoded into a typed struct with
//! declared defaults. A field that is missing or holds the wrong type
//! decodes to its zero value instead of failing the whole extraction;
//! only a missing composite is an error.

use netweave_common::config::ComposerConfig;
use netweave_common::error::{NetweaveError, Result};
use serde::Deserialize;

use crate::function::{Resource, RunFunctionRequest};

/// The topology a composite asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologySpec {
    /// Naming and correlation root.
    pub id: String,
    /// Number of network units to synthesize.
    pub count: u64,
    /// Whether each network unit gets a paired gateway.
    pub include_gateway: bool,
    /// Region every unit is provisioned in.
    pub region: String,
    /// Provider config every unit is provisioned under.
    pub provider_config_name: String,
}

impl TopologySpec {
    /// Decodes the topology from a composite resource and applies the
    /// region and provider-config defaults from `config`.
    #[must_use]
    pub fn from_composite(composite: &Resource, config: &ComposerConfig) -> Self {
        let raw = composite
            .resource
            .get("spec")
            .map_or_else(RawSpec::default, |spec| {
                RawSpec::deserialize(spec).unwrap_or_else(|e| {
                    tracing::debug!(
                        error = %e,
                        "composite spec is not an object, using zero values"
                    );
                    RawSpec::default()
                })
            });

        Self {
            id: raw.id,
            count: raw.count,
            include_gateway: raw.include_gateway,
            region: non_empty_or(raw.region, &config.default_region),
            provider_config_name: non_empty_or(
                raw.provider_config_name,
                &config.default_provider_config,
            ),
        }
    }
}

/// Returns the observed composite carried by `req`.
///
/// # Errors
///
/// Returns [`NetweaveError::MissingComposite`] if the request has none.
pub fn observed_composite(req: &RunFunctionRequest) -> Result<&Resource> {
    req.observed
        .composite
        .as_ref()
        .ok_or(NetweaveError::MissingComposite)
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_owned()
    } else {
        value
    }
}

/// The `spec` object as written by the user, before defaulting.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSpec {
    #[serde(deserialize_with = "lenient::string")]
    id: String,
    #[serde(deserialize_with = "lenient::count")]
    count: u64,
    #[serde(deserialize_with = "lenient::boolean")]
    include_gateway: bool,
    #[serde(deserialize_with = "lenient::string")]
    region: String,
    #[serde(deserialize_with = "lenient::string")]
    provider_config_name: String,
}

/// Field decoders that coerce mistyped values to zero values.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            other => {
                tracing::debug!(value = %other, "expected a string, using empty string");
                String::new()
            }
        })
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            other => {
                tracing::debug!(value = %other, "expected a boolean, using false");
                false
            }
        })
    }

    /// Non-negative integers pass through. Whole floats are accepted because
    /// protobuf `Struct` values carry every number as a double. Anything
    /// else, negative numbers included, yields zero.
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(d)?;
        let count = match &value {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_non_negative)),
            _ => None,
        };
        Ok(count.unwrap_or_else(|| {
            tracing::debug!(value = %value, "count is not a non-negative integer, using 0");
            0
        }))
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn whole_non_negative(f: f64) -> Option<u64> {
        (f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64).then_some(f as u64)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn composite(body: Value) -> Resource {
        Resource::new(serde_json::from_value(body).expect("composite must be an object"))
    }

    fn extract(body: Value) -> TopologySpec {
        TopologySpec::from_composite(&composite(body), &ComposerConfig::default())
    }

    #[test]
    fn extracts_all_fields() {
        let spec = extract(json!({
            "apiVersion": "xp-layers.crossplane.io/v1alpha1",
            "kind": "XNetwork",
            "spec": {
                "id": "code",
                "count": 3,
                "includeGateway": true,
                "region": "us-east-1",
                "providerConfigName": "aws",
                "compositionSelector": {"matchLabels": {"layer": "code"}}
            }
        }));
        assert_eq!(
            spec,
            TopologySpec {
                id: "code".into(),
                count: 3,
                include_gateway: true,
                region: "us-east-1".into(),
                provider_config_name: "aws".into(),
            }
        );
    }

    #[test]
    fn missing_fields_take_zero_values_and_defaults() {
        let spec = extract(json!({"spec": {}}));
        assert_eq!(spec.id, "");
        assert_eq!(spec.count, 0);
        assert!(!spec.include_gateway);
        assert_eq!(spec.region, "eu-central-1");
        assert_eq!(spec.provider_config_name, "default");
    }

    #[test]
    fn empty_strings_take_defaults() {
        let spec = extract(json!({"spec": {"region": "", "providerConfigName": ""}}));
        assert_eq!(spec.region, "eu-central-1");
        assert_eq!(spec.provider_config_name, "default");
    }

    #[test]
    fn configured_defaults_are_used() {
        let config = ComposerConfig {
            default_region: "ap-south-1".into(),
            default_provider_config: "shared".into(),
            ..ComposerConfig::default()
        };
        let spec = TopologySpec::from_composite(&composite(json!({"spec": {"id": "x"}})), &config);
        assert_eq!(spec.region, "ap-south-1");
        assert_eq!(spec.provider_config_name, "shared");
    }

    #[test]
    fn missing_spec_object_is_tolerated() {
        let spec = extract(json!({"kind": "XNetwork"}));
        assert_eq!(spec.count, 0);
        assert_eq!(spec.region, "eu-central-1");
    }

    #[test]
    fn non_object_spec_is_tolerated() {
        let spec = extract(json!({"spec": "nonsense"}));
        assert_eq!(spec.id, "");
        assert_eq!(spec.provider_config_name, "default");
    }

    #[test]
    fn mistyped_fields_take_zero_values() {
        let spec = extract(json!({"spec": {
            "id": 42,
            "count": "three",
            "includeGateway": "yes",
            "region": ["eu-west-1"],
            "providerConfigName": null
        }}));
        assert_eq!(spec.id, "");
        assert_eq!(spec.count, 0);
        assert!(!spec.include_gateway);
        assert_eq!(spec.region, "eu-central-1");
        assert_eq!(spec.provider_config_name, "default");
    }

    #[test]
    fn negative_count_becomes_zero() {
        assert_eq!(extract(json!({"spec": {"count": -2}})).count, 0);
    }

    #[test]
    fn whole_float_count_is_accepted() {
        assert_eq!(extract(json!({"spec": {"count": 2.0}})).count, 2);
    }

    #[test]
    fn fractional_count_becomes_zero() {
        assert_eq!(extract(json!({"spec": {"count": 1.5}})).count, 0);
    }

    #[test]
    fn float_count_beyond_u64_becomes_zero() {
        let two_pow_64 = 18_446_744_073_709_551_616.0_f64;
        assert_eq!(extract(json!({"spec": {"count": two_pow_64}})).count, 0);
    }

    #[test]
    fn large_whole_float_count_is_exact() {
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        assert_eq!(
            extract(json!({"spec": {"count": two_pow_63}})).count,
            1_u64 << 63
        );
    }

    #[test]
    fn observed_composite_is_required() {
        let req = RunFunctionRequest::default();
        let err = observed_composite(&req).unwrap_err();
        assert!(matches!(err, NetweaveError::MissingComposite));
    }

    #[test]
    fn observed_composite_is_returned_when_present() {
        let mut req = RunFunctionRequest::default();
        req.observed.composite = Some(composite(json!({"kind": "XNetwork"})));
        let found = observed_composite(&req).expect("composite");
        assert_eq!(found.resource.get("kind"), Some(&json!("XNetwork")));
    }
}
