//! Wire shapes of the generated resources.
//!
//! [`type_meta`] is the table that stamps `apiVersion` and `kind` onto a
//! unit. The structs below serialize to the managed-resource documents the
//! provider expects, with camelCase field names.

use netweave_common::constants::EC2_API_VERSION;
use netweave_common::types::{Labels, ResourceName, UnitKind};
use serde::Serialize;

/// `apiVersion` and `kind` of a generated resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMeta {
    /// API group and version.
    pub api_version: &'static str,
    /// Resource kind.
    pub kind: &'static str,
}

/// Returns the wire type of `kind`.
#[must_use]
pub const fn type_meta(kind: UnitKind) -> TypeMeta {
    match kind {
        UnitKind::NetworkUnit => TypeMeta {
            api_version: EC2_API_VERSION,
            kind: "VPC",
        },
        UnitKind::GatewayUnit => TypeMeta {
            api_version: EC2_API_VERSION,
            kind: "InternetGateway",
        },
    }
}

/// A managed resource document: type, metadata, and a kind-specific spec.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedResource<P> {
    /// API group and version.
    pub api_version: &'static str,
    /// Resource kind.
    pub kind: &'static str,
    /// Object metadata.
    pub metadata: ObjectMeta,
    /// Desired parameters and provider reference.
    pub spec: ResourceSpec<P>,
}

/// Name and labels of a managed resource.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectMeta {
    /// Resource name.
    pub name: ResourceName,
    /// Correlation labels.
    pub labels: Labels,
}

/// The `spec` of a managed resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec<P> {
    /// Parameters handed to the cloud provider.
    pub for_provider: P,
    /// Provider config the resource is provisioned under.
    pub provider_config_ref: Reference,
}

/// A reference to another object by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Name of the referenced object.
    pub name: String,
}

/// `forProvider` parameters of a VPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcParameters {
    /// Region the VPC lives in.
    pub region: String,
    /// IPv4 address block.
    pub cidr_block: String,
    /// Whether DNS resolution is supported.
    pub enable_dns_support: bool,
    /// Whether instances get DNS hostnames.
    pub enable_dns_hostnames: bool,
}

/// `forProvider` parameters of an internet gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternetGatewayParameters {
    /// Region the gateway lives in.
    pub region: String,
    /// Selects the VPC the gateway attaches to.
    pub vpc_id_selector: Selector,
}

/// Label selector resolved by the provider once the selected resource exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    /// Only match resources owned by the same controller.
    pub match_controller_ref: bool,
    /// Labels the selected resource must carry.
    pub match_labels: Labels,
}
