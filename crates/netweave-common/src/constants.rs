//! Naming, labeling, and default values shared by the composer and the CLI.

/// Namespace prepended to every correlation label key.
pub const LABEL_PREFIX: &str = "networks.meta.fn.crossplane.io/";

/// Label carrying the topology identifier on every generated unit.
pub const LABEL_NETWORK_ID: &str = "networks.meta.fn.crossplane.io/network-id";

/// Label carrying a network unit's own name, matched by gateway selectors.
pub const LABEL_VPC_ID: &str = "networks.meta.fn.crossplane.io/vpc-id";

/// Region used when the composite leaves `spec.region` empty.
pub const DEFAULT_REGION: &str = "eu-central-1";

/// Provider config used when the composite leaves `spec.providerConfigName` empty.
pub const DEFAULT_PROVIDER_CONFIG: &str = "default";

/// Address block assigned to every network unit.
pub const NETWORK_CIDR_BLOCK: &str = "192.168.0.0/16";

/// Time-to-live attached to successful responses, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 60;

/// API group and version of the generated EC2 resources.
pub const EC2_API_VERSION: &str = "ec2.aws.upbound.io/v1beta1";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "nwv";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_keys_share_the_prefix() {
        assert!(LABEL_NETWORK_ID.starts_with(LABEL_PREFIX));
        assert!(LABEL_VPC_ID.starts_with(LABEL_PREFIX));
    }
}
