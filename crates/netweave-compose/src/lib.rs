//! # netweave-compose
//!
//! Composition function for network topologies.
//!
//! Handles:
//! - **Function**: Request/response model of a composition function invocation.
//! - **Spec**: Lenient, defaulted extraction of the topology from the observed composite.
//! - **Schema**: Wire shapes and the `apiVersion`/`kind` table of generated resources.
//! - **Synth**: Per-replica synthesis of network and gateway units with correlation labels.
//! - **Composer**: Replica loop, merge into the desired resources, response assembly.
//! - **Graph**: Offline resolution of label selectors into a provisioning order.

pub mod composer;
pub mod function;
pub mod graph;
pub mod response;
pub mod schema;
pub mod spec;
pub mod synth;

pub use composer::{Composer, Insertions, merge};
pub use function::{RunFunctionRequest, RunFunctionResponse};
pub use spec::TopologySpec;
