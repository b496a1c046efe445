//! The composer: replica loop, merge, and response assembly.
//!
//! [`Composer::compose`] is pure. It turns a [`TopologySpec`] into an
//! ordered list of insertions and never sees the desired resources it will
//! be merged into. [`merge`] is the only place that mutates a desired
//! resource map, and it only upserts the names it is given.

use netweave_common::config::ComposerConfig;
use netweave_common::error::Result;
use netweave_common::types::ResourceName;

use crate::function::{DesiredResources, Resource, RunFunctionRequest, RunFunctionResponse};
use crate::response;
use crate::spec::{self, TopologySpec};
use crate::synth;

/// Resources produced by one composition, in generation order.
pub type Insertions = Vec<(ResourceName, Resource)>;

/// Generates network topologies from composite resources.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    config: ComposerConfig,
}

impl Composer {
    /// Creates a composer with the given configuration.
    #[must_use]
    pub const fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Reads the topology declared by the request's observed composite.
    ///
    /// # Errors
    ///
    /// Returns an error if the request has no observed composite. Missing
    /// or mistyped fields inside it are defaulted, never reported.
    pub fn extract(&self, req: &RunFunctionRequest) -> Result<TopologySpec> {
        let composite = spec::observed_composite(req)?;
        Ok(TopologySpec::from_composite(composite, &self.config))
    }

    /// Synthesizes every replica of `spec` in increasing index order.
    ///
    /// `count` is not capped: the insertions hold one or two entries per
    /// replica, so time and memory grow linearly with it.
    ///
    /// # Errors
    ///
    /// Returns an error as soon as a unit fails to convert to its wire
    /// form; no later replica is synthesized.
    pub fn compose(&self, spec: &TopologySpec) -> Result<Insertions> {
        tracing::debug!(
            id = %spec.id,
            count = spec.count,
            include_gateway = spec.include_gateway,
            "synthesizing replicas"
        );
        let mut insertions = Insertions::new();

        for index in 0..spec.count {
            for unit in synth::synthesize_replica(spec, index) {
                let name = unit.name.clone();
                let kind = unit.kind();
                let composed = unit.into_composed()?;
                tracing::debug!(name = %name, kind = %kind, "synthesized unit");
                insertions.push((name, composed));
            }
        }

        Ok(insertions)
    }

    /// Runs one invocation end to end.
    ///
    /// Fatal conditions are reported in the returned response, whose
    /// desired state is then left exactly as the request carried it.
    #[must_use]
    pub fn run_function(&self, req: &RunFunctionRequest) -> RunFunctionResponse {
        tracing::info!(tag = %req.meta.tag, "running function");

        let mut rsp = response::to(req, self.config.ttl());

        let spec = match self.extract(req) {
            Ok(spec) => spec,
            Err(err) => {
                response::fatal(&mut rsp, "cannot get observed composite resource", &err);
                return rsp;
            }
        };

        let insertions = match self.compose(&spec) {
            Ok(insertions) => insertions,
            Err(err) => {
                response::fatal(&mut rsp, "cannot compose network resources", &err);
                return rsp;
            }
        };

        let added = insertions.len();
        let mut desired = req.desired.resources.clone();
        merge(&mut desired, insertions);
        response::set_desired_resources(&mut rsp, desired);

        tracing::info!(
            id = %spec.id,
            count = spec.count,
            include_gateway = spec.include_gateway,
            region = %spec.region,
            provider_config_name = %spec.provider_config_name,
            added,
            "function ran OK"
        );
        rsp
    }
}

/// Upserts `insertions` into `desired` by name.
///
/// Entries whose names are not among the insertions are left untouched.
pub fn merge(desired: &mut DesiredResources, insertions: Insertions) {
    for (name, resource) in insertions {
        let _ = desired.insert(name, resource);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use netweave_common::types::UnitKind;
    use proptest::prelude::*;
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::function::{RequestMeta, Severity};

    fn object(value: Value) -> Map<String, Value> {
        serde_json::from_value(value).expect("object")
    }

    fn request(spec: Value) -> RunFunctionRequest {
        let mut req = RunFunctionRequest {
            meta: RequestMeta {
                tag: "tag-1".into(),
            },
            ..RunFunctionRequest::default()
        };
        req.observed.composite = Some(Resource::new(object(json!({
            "apiVersion": "xp-layers.crossplane.io/v1alpha1",
            "kind": "XNetwork",
            "metadata": {"name": "network-code"},
            "spec": spec
        }))));
        req
    }

    fn topology(id: &str, count: u64, include_gateway: bool) -> TopologySpec {
        TopologySpec {
            id: id.into(),
            count,
            include_gateway,
            region: "eu-central-1".into(),
            provider_config_name: "default".into(),
        }
    }

    #[test]
    fn adds_one_network_with_gateway() {
        let req = request(json!({
            "id": "code",
            "count": 1,
            "includeGateway": true,
            "providerConfigName": "default",
            "region": "eu-central-1",
            "compositionSelector": {"matchLabels": {"layer": "code"}}
        }));

        let rsp = Composer::default().run_function(&req);

        assert!(rsp.results.is_empty(), "unexpected results: {:?}", rsp.results);
        assert_eq!(rsp.meta.ttl, Some(Duration::from_secs(60)));
        assert_eq!(
            serde_json::to_value(&rsp.desired).expect("serialize"),
            json!({
                "resources": {
                    "vpc-code-0": {"resource": {
                        "apiVersion": "ec2.aws.upbound.io/v1beta1",
                        "kind": "VPC",
                        "metadata": {
                            "labels": {
                                "networks.meta.fn.crossplane.io/network-id": "code",
                                "networks.meta.fn.crossplane.io/vpc-id": "vpc-code-0"
                            },
                            "name": "vpc-code-0"
                        },
                        "spec": {
                            "forProvider": {
                                "cidrBlock": "192.168.0.0/16",
                                "enableDnsHostnames": true,
                                "enableDnsSupport": true,
                                "region": "eu-central-1"
                            },
                            "providerConfigRef": {"name": "default"}
                        }
                    }},
                    "gateway-code-0": {"resource": {
                        "apiVersion": "ec2.aws.upbound.io/v1beta1",
                        "kind": "InternetGateway",
                        "metadata": {
                            "labels": {"networks.meta.fn.crossplane.io/network-id": "code"},
                            "name": "gateway-code-0"
                        },
                        "spec": {
                            "forProvider": {
                                "region": "eu-central-1",
                                "vpcIdSelector": {
                                    "matchControllerRef": true,
                                    "matchLabels": {
                                        "networks.meta.fn.crossplane.io/vpc-id": "vpc-code-0"
                                    }
                                }
                            },
                            "providerConfigRef": {"name": "default"}
                        }
                    }}
                }
            })
        );
    }

    #[test]
    fn response_echoes_tag_and_context() {
        let mut req = request(json!({"id": "a", "count": 1}));
        req.context = Some(json!({"key": "value"}));
        let rsp = Composer::default().run_function(&req);
        assert_eq!(rsp.meta.tag, "tag-1");
        assert_eq!(rsp.context, Some(json!({"key": "value"})));
    }

    #[test]
    fn zero_count_adds_nothing_and_succeeds() {
        let req = request(json!({"id": "empty", "count": 0, "includeGateway": true}));
        let rsp = Composer::default().run_function(&req);
        assert!(!rsp.is_fatal());
        assert!(rsp.desired.resources.is_empty());
        assert_eq!(rsp.meta.ttl, Some(Duration::from_secs(60)));
    }

    #[test]
    fn count_without_gateway_yields_only_vpcs() {
        let insertions = Composer::default()
            .compose(&topology("net", 3, false))
            .expect("compose");
        let names: Vec<&str> = insertions.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["vpc-net-0", "vpc-net-1", "vpc-net-2"]);
    }

    #[test]
    fn insertions_follow_increasing_index_order() {
        let insertions = Composer::default()
            .compose(&topology("net", 2, true))
            .expect("compose");
        let names: Vec<&str> = insertions.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["vpc-net-0", "gateway-net-0", "vpc-net-1", "gateway-net-1"]
        );
    }

    #[test]
    fn defaults_reach_every_unit() {
        let req = request(json!({"id": "d", "count": 2, "includeGateway": true}));
        let rsp = Composer::default().run_function(&req);
        assert_eq!(rsp.desired.resources.len(), 4);
        for resource in rsp.desired.resources.values() {
            let spec = &resource.resource["spec"];
            assert_eq!(spec["forProvider"]["region"], json!("eu-central-1"));
            assert_eq!(spec["providerConfigRef"]["name"], json!("default"));
        }
    }

    #[test]
    fn missing_composite_is_fatal_and_adds_nothing() {
        let mut req = RunFunctionRequest::default();
        let _ = req.desired.resources.insert(
            ResourceName::new("bucket"),
            Resource::new(object(json!({"kind": "Bucket"}))),
        );

        let rsp = Composer::default().run_function(&req);

        assert!(rsp.is_fatal());
        assert_eq!(rsp.results.len(), 1);
        assert_eq!(rsp.results[0].severity, Severity::Fatal);
        assert!(!rsp.results[0].message.is_empty());
        assert_eq!(rsp.desired, req.desired);
    }

    #[test]
    fn unrelated_desired_resources_survive() {
        let mut req = request(json!({"id": "code", "count": 1, "includeGateway": true}));
        let bucket = Resource::new(object(json!({"kind": "Bucket", "metadata": {"name": "b"}})));
        let _ = req
            .desired
            .resources
            .insert(ResourceName::new("bucket"), bucket.clone());
        req.desired.composite = Some(Resource::new(object(json!({"kind": "XNetwork"}))));

        let rsp = Composer::default().run_function(&req);

        assert_eq!(rsp.desired.resources.len(), 3);
        assert_eq!(rsp.desired.resources[&ResourceName::new("bucket")], bucket);
        assert_eq!(rsp.desired.composite, req.desired.composite);
    }

    #[test]
    fn merge_overwrites_same_name_only() {
        let mut desired = DesiredResources::new();
        let _ = desired.insert(ResourceName::new("vpc-a-0"), Resource::default());
        let _ = desired.insert(ResourceName::new("other"), Resource::default());

        let insertions = Composer::default()
            .compose(&topology("a", 1, false))
            .expect("compose");
        merge(&mut desired, insertions);

        assert_eq!(desired.len(), 2);
        assert_eq!(
            desired[&ResourceName::new("vpc-a-0")].resource["kind"],
            json!("VPC")
        );
        assert_eq!(desired[&ResourceName::new("other")], Resource::default());
    }

    #[test]
    fn repeated_invocations_are_byte_identical() {
        let req = request(json!({"id": "idem", "count": 3, "includeGateway": true}));
        let composer = Composer::default();
        let first = serde_json::to_string(&composer.run_function(&req)).expect("serialize");
        let second = serde_json::to_string(&composer.run_function(&req)).expect("serialize");
        assert_eq!(first, second);
    }

    #[test]
    fn configured_ttl_is_applied() {
        let composer = Composer::new(ComposerConfig {
            ttl_secs: 15,
            ..ComposerConfig::default()
        });
        let rsp = composer.run_function(&request(json!({"id": "t", "count": 1})));
        assert_eq!(rsp.meta.ttl, Some(Duration::from_secs(15)));
    }

    proptest! {
        #[test]
        fn names_are_distinct_and_counted(id in "[a-z0-9]{0,12}", count in 0u64..40, gw in any::<bool>()) {
            let insertions = Composer::default()
                .compose(&topology(&id, count, gw))
                .expect("compose");
            let per_replica = if gw { 2 } else { 1 };
            prop_assert_eq!(insertions.len() as u64, count * per_replica);

            let mut names: Vec<&ResourceName> = insertions.iter().map(|(n, _)| n).collect();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), insertions.len());

            for index in 0..count {
                let vpc = ResourceName::for_unit(UnitKind::NetworkUnit, &id, index);
                prop_assert!(insertions.iter().any(|(n, _)| *n == vpc));
            }
        }

        #[test]
        fn every_gateway_selects_its_paired_vpc(id in "[a-z]{1,8}", count in 1u64..10) {
            let insertions = Composer::default()
                .compose(&topology(&id, count, true))
                .expect("compose");
            for (name, resource) in &insertions {
                if resource.resource["kind"] != json!("InternetGateway") {
                    continue;
                }
                let index = name.as_str().rsplit('-').next().expect("index");
                let selector = &resource.resource["spec"]["forProvider"]["vpcIdSelector"];
                prop_assert_eq!(&selector["matchControllerRef"], &json!(true));
                prop_assert_eq!(
                    &selector["matchLabels"],
                    &json!({"networks.meta.fn.crossplane.io/vpc-id": format!("vpc-{id}-{index}")})
                );
            }
        }
    }
}
