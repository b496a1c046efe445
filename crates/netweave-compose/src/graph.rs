//! Offline resolution of label selectors using `petgraph`.
//!
//! The provider resolves a gateway's `vpcIdSelector` only after the VPC
//! exists. This module performs the same matching on a desired resource set
//! ahead of time, so the wiring can be inspected and the resources listed
//! in the order they become resolvable.

use std::collections::HashMap;

use netweave_common::error::{NetweaveError, Result};
use netweave_common::types::{Labels, ResourceName};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::function::DesiredResources;

/// A selector found under `spec.forProvider` of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    /// Field the selector was found in (e.g. `vpcIdSelector`).
    #[serde(skip)]
    pub field: String,
    /// Whether the selected resource must share the controller.
    #[serde(default)]
    pub match_controller_ref: bool,
    /// Labels the selected resource must carry.
    #[serde(default)]
    pub match_labels: Labels,
}

impl LabelSelector {
    /// Returns `true` if every `matchLabels` pair is present in `labels`.
    #[must_use]
    pub fn matches(&self, labels: &Labels) -> bool {
        self.match_labels
            .iter()
            .all(|(k, v)| labels.get(k).is_some_and(|l| l == v))
    }
}

/// A selector resolved to the resource it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Resource carrying the selector.
    pub selector_of: ResourceName,
    /// Field the selector was found in.
    pub field: String,
    /// Resource the selector matched.
    pub selected: ResourceName,
}

/// A selector that matched no resource in the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedSelector {
    /// Resource carrying the selector.
    pub selector_of: ResourceName,
    /// Field the selector was found in.
    pub field: String,
}

/// Graph of selector dependencies between desired resources.
#[derive(Debug)]
pub struct ProvisioningGraph {
    /// Edges point from the selected resource to the one selecting it.
    graph: DiGraph<ResourceName, String>,
    unresolved: Vec<UnresolvedSelector>,
}

impl ProvisioningGraph {
    /// Builds the graph by matching every selector in `desired` against the
    /// labels of every other resource in the set.
    ///
    /// All resources of one desired set share the same controlling
    /// composite, so `matchControllerRef` is satisfied within the set.
    #[must_use]
    pub fn from_desired(desired: &DesiredResources) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<&ResourceName, NodeIndex> = HashMap::new();
        for name in desired.keys() {
            let _ = nodes.insert(name, graph.add_node(name.clone()));
        }

        let labels: Vec<(&ResourceName, Labels)> = desired
            .iter()
            .map(|(name, r)| (name, labels_of(&r.resource)))
            .collect();

        let mut unresolved = Vec::new();
        for (name, resource) in desired {
            for selector in selectors_of(&resource.resource) {
                let mut matched = false;
                for (candidate, candidate_labels) in &labels {
                    if *candidate == name || !selector.matches(candidate_labels) {
                        continue;
                    }
                    matched = true;
                    let _ =
                        graph.add_edge(nodes[candidate], nodes[name], selector.field.clone());
                }
                if !matched {
                    tracing::debug!(
                        resource = %name,
                        field = %selector.field,
                        "selector matches nothing"
                    );
                    unresolved.push(UnresolvedSelector {
                        selector_of: name.clone(),
                        field: selector.field,
                    });
                }
            }
        }

        Self { graph, unresolved }
    }

    /// Returns every resolved selector.
    #[must_use]
    pub fn bindings(&self) -> Vec<Binding> {
        self.graph
            .edge_indices()
            .filter_map(|edge| {
                let (from, to) = self.graph.edge_endpoints(edge)?;
                Some(Binding {
                    selector_of: self.graph[to].clone(),
                    field: self.graph[edge].clone(),
                    selected: self.graph[from].clone(),
                })
            })
            .collect()
    }

    /// Returns the selectors that matched nothing.
    #[must_use]
    pub fn unresolved(&self) -> &[UnresolvedSelector] {
        &self.unresolved
    }

    /// Returns the resources ordered so that every selected resource comes
    /// before the resources selecting it.
    ///
    /// # Errors
    ///
    /// Returns an error if selectors form a cycle.
    pub fn provisioning_order(&self) -> Result<Vec<ResourceName>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .iter()
                .filter_map(|&idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(cycle) => Err(NetweaveError::Config {
                message: format!(
                    "cyclic selector dependency involving \"{}\"",
                    self.graph[cycle.node_id()]
                ),
            }),
        }
    }
}

/// String-valued `metadata.labels` of a resource body.
fn labels_of(resource: &Map<String, Value>) -> Labels {
    resource
        .get("metadata")
        .and_then(|m| m.get("labels"))
        .and_then(Value::as_object)
        .map(|labels| {
            labels
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_owned())))
                .collect()
        })
        .unwrap_or_default()
}

/// Selectors under `spec.forProvider`, i.e. fields named `*Selector`.
fn selectors_of(resource: &Map<String, Value>) -> Vec<LabelSelector> {
    let Some(for_provider) = resource
        .get("spec")
        .and_then(|s| s.get("forProvider"))
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    for_provider
        .iter()
        .filter(|(field, _)| field.ends_with("Selector"))
        .filter_map(|(field, value)| {
            let mut selector = LabelSelector::deserialize(value).ok()?;
            selector.field.clone_from(field);
            Some(selector)
        })
        .collect()
}
