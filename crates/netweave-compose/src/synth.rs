//! Per-replica synthesis of network and gateway units.
//!
//! Units are linked through correlation labels rather than identifiers:
//! the cloud identifier of a VPC does not exist until the provider creates
//! it, so a gateway carries a selector on the VPC's `vpc-id` label instead.

use netweave_common::constants::{LABEL_NETWORK_ID, LABEL_VPC_ID, NETWORK_CIDR_BLOCK};
use netweave_common::error::{NetweaveError, Result};
use netweave_common::types::{Labels, ResourceName, UnitKind};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::function::Resource;
use crate::schema::{
    InternetGatewayParameters, ManagedResource, ObjectMeta, Reference, ResourceSpec, Selector,
    VpcParameters, type_meta,
};
use crate::spec::TopologySpec;

/// One synthesized unit, before conversion to its wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Deterministic name, also the key in the desired resources.
    pub name: ResourceName,
    /// Correlation labels.
    pub labels: Labels,
    /// Kind-specific parameters.
    pub parameters: UnitParameters,
    /// Provider config the unit is provisioned under.
    pub provider_config_ref: String,
}

/// Kind-specific parameters of a [`GeneratedUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitParameters {
    /// Parameters of a network unit.
    Network(VpcParameters),
    /// Parameters of a gateway unit.
    Gateway(InternetGatewayParameters),
}

impl GeneratedUnit {
    /// Returns the kind of this unit.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        match self.parameters {
            UnitParameters::Network(_) => UnitKind::NetworkUnit,
            UnitParameters::Gateway(_) => UnitKind::GatewayUnit,
        }
    }

    /// Converts the unit into a desired composed resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit cannot be serialized into an object.
    pub fn into_composed(self) -> Result<Resource> {
        let kind = self.kind();
        let meta = type_meta(kind);
        let name = self.name.clone();
        let metadata = ObjectMeta {
            name: self.name,
            labels: self.labels,
        };
        let provider_config_ref = Reference {
            name: self.provider_config_ref,
        };
        let body = match self.parameters {
            UnitParameters::Network(for_provider) => composed_from(
                &name,
                meta.kind,
                &ManagedResource {
                    api_version: meta.api_version,
                    kind: meta.kind,
                    metadata,
                    spec: ResourceSpec {
                        for_provider,
                        provider_config_ref,
                    },
                },
            )?,
            UnitParameters::Gateway(for_provider) => composed_from(
                &name,
                meta.kind,
                &ManagedResource {
                    api_version: meta.api_version,
                    kind: meta.kind,
                    metadata,
                    spec: ResourceSpec {
                        for_provider,
                        provider_config_ref,
                    },
                },
            )?,
        };
        Ok(Resource::new(body))
    }
}

/// Serializes the wire form of unit `name` into the untyped object stored
/// in the desired resources.
fn composed_from<T: Serialize>(
    name: &ResourceName,
    kind: &'static str,
    body: &T,
) -> Result<Map<String, Value>> {
    match serde_json::to_value(body) {
        Ok(Value::Object(body)) => Ok(body),
        Ok(_) => Err(NetweaveError::NotAnObject {
            name: name.to_string(),
            kind,
        }),
        Err(source) => Err(NetweaveError::Conversion {
            name: name.to_string(),
            kind,
            source,
        }),
    }
}

/// Labels shared by every unit of topology `id`.
#[must_use]
pub fn network_labels(id: &str) -> Labels {
    Labels::from([(LABEL_NETWORK_ID.to_owned(), id.to_owned())])
}

/// Builds the `index`-th network unit of `spec`.
#[must_use]
pub fn network_unit(spec: &TopologySpec, index: u64) -> GeneratedUnit {
    let name = ResourceName::for_unit(UnitKind::NetworkUnit, &spec.id, index);
    let mut labels = network_labels(&spec.id);
    let _ = labels.insert(LABEL_VPC_ID.to_owned(), name.to_string());

    GeneratedUnit {
        name,
        labels,
        parameters: UnitParameters::Network(VpcParameters {
            region: spec.region.clone(),
            cidr_block: NETWORK_CIDR_BLOCK.to_owned(),
            enable_dns_support: true,
            enable_dns_hostnames: true,
        }),
        provider_config_ref: spec.provider_config_name.clone(),
    }
}

/// Builds the gateway paired with network unit `vpc`.
#[must_use]
pub fn gateway_unit(spec: &TopologySpec, index: u64, vpc: &ResourceName) -> GeneratedUnit {
    GeneratedUnit {
        name: ResourceName::for_unit(UnitKind::GatewayUnit, &spec.id, index),
        labels: network_labels(&spec.id),
        parameters: UnitParameters::Gateway(InternetGatewayParameters {
            region: spec.region.clone(),
            vpc_id_selector: Selector {
                match_controller_ref: true,
                match_labels: Labels::from([(LABEL_VPC_ID.to_owned(), vpc.to_string())]),
            },
        }),
        provider_config_ref: spec.provider_config_name.clone(),
    }
}

/// Synthesizes the units of replica `index`: the network unit, followed by
/// its gateway when the topology asks for one.
#[must_use]
pub fn synthesize_replica(spec: &TopologySpec, index: u64) -> Vec<GeneratedUnit> {
    let vpc = network_unit(spec, index);
    let gateway = spec
        .include_gateway
        .then(|| gateway_unit(spec, index, &vpc.name));
    let mut units = vec![vpc];
    units.extend(gateway);
    units
}
