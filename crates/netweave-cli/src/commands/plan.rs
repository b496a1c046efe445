//! `nwv plan`: Show rendered resources in provisioning order.

use std::collections::BTreeMap;
use std::fmt::Write;

use clap::Args;
use netweave_common::types::ResourceName;
use netweave_compose::Composer;
use netweave_compose::function::DesiredResources;
use netweave_compose::graph::{ProvisioningGraph, UnresolvedSelector};
use serde::Serialize;
use serde_json::Value;

use super::render::{self, RenderArgs};
use crate::output::{self, OutputFormat};

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the composite resource (JSON or YAML), or `-` for stdin.
    pub composite: String,

    /// Existing desired resources: a mapping of name to resource body.
    #[arg(long)]
    pub desired: Option<String>,
}

/// One resource of the plan, in provisioning order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    /// Resource name.
    pub name: ResourceName,
    /// Managed resource kind, `?` when the body carries none.
    pub kind: String,
    /// Region from `spec.forProvider.region`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Selector fields of this resource and the resources they select.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub selects: BTreeMap<String, ResourceName>,
}

/// A provisioning plan for one composite.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Path of the composite the plan was rendered from.
    pub source: String,
    /// Resources in the order they can be provisioned.
    pub steps: Vec<PlanStep>,
    /// Selectors that match no resource of the set.
    pub unresolved: Vec<UnresolvedSelector>,
}

/// Executes the `plan` command.
///
/// Renders the composite, resolves selectors between the resulting
/// resources, and prints them in the order they can be provisioned. The
/// plan is printed as text unless an output format is given.
///
/// # Errors
///
/// Returns an error if rendering fails or selectors form a cycle.
pub fn execute(
    composer: &Composer,
    args: PlanArgs,
    format: Option<OutputFormat>,
) -> anyhow::Result<()> {
    tracing::info!(path = %args.composite, "planning composite");
    let desired = render::render_desired(
        composer,
        &RenderArgs {
            composite: args.composite.clone(),
            desired: args.desired,
        },
    )?;
    let plan = build_plan(&args.composite, &desired)?;
    tracing::debug!(
        steps = plan.steps.len(),
        unresolved = plan.unresolved.len(),
        "plan built"
    );
    match format {
        Some(format) => print!("{}", output::document(&plan, format)?),
        None => print!("{}", format_plan(&plan)?),
    }
    Ok(())
}

/// Resolves selectors in `desired` and orders its resources.
///
/// # Errors
///
/// Returns an error if selectors form a cycle.
pub fn build_plan(source: &str, desired: &DesiredResources) -> anyhow::Result<Plan> {
    let graph = ProvisioningGraph::from_desired(desired);
    let order = graph.provisioning_order()?;
    let bindings = graph.bindings();

    let steps = order
        .into_iter()
        .map(|name| {
            let body = &desired[&name].resource;
            let kind = body.get("kind").and_then(Value::as_str).unwrap_or("?");
            let region = body
                .get("spec")
                .and_then(|s| s.get("forProvider"))
                .and_then(|p| p.get("region"))
                .and_then(Value::as_str);
            let selects = bindings
                .iter()
                .filter(|b| b.selector_of == name)
                .map(|b| (b.field.clone(), b.selected.clone()))
                .collect();
            PlanStep {
                kind: kind.to_owned(),
                region: region.map(str::to_owned),
                selects,
                name,
            }
        })
        .collect();

    Ok(Plan {
        source: source.to_owned(),
        steps,
        unresolved: graph.unresolved().to_vec(),
    })
}

/// Formats `plan` as human-readable text.
///
/// # Errors
///
/// Returns an error if writing to the buffer fails.
pub fn format_plan(plan: &Plan) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "Provisioning plan for: {}", plan.source)?;
    writeln!(out, "{}", "\u{2550}".repeat(35))?;
    writeln!(out)?;

    for step in &plan.steps {
        writeln!(out, "  + {} ({})", step.name, step.kind)?;
        if let Some(region) = &step.region {
            writeln!(out, "      region: {region}")?;
        }
        for (field, selected) in &step.selects {
            writeln!(out, "      {field} -> {selected}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "  {} resource(s) will be provisioned.", plan.steps.len())?;

    if !plan.unresolved.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Unresolved selectors:")?;
        for unresolved in &plan.unresolved {
            writeln!(out, "    {}.{}", unresolved.selector_of, unresolved.field)?;
        }
    }

    Ok(out)
}
