//! `nwv render`: Render the desired resources for a composite resource.

use clap::Args;
use netweave_compose::function::{DesiredResources, Resource};
use netweave_compose::{Composer, RunFunctionRequest};
use serde_json::{Map, Value};

use crate::input;
use crate::output::{self, OutputFormat};

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Path to the composite resource (JSON or YAML), or `-` for stdin.
    pub composite: String,

    /// Existing desired resources: a mapping of name to resource body.
    #[arg(long)]
    pub desired: Option<String>,
}

/// Executes the `render` command.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded or the function reports
/// a fatal result.
pub fn execute(
    composer: &Composer,
    args: RenderArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    tracing::info!(path = %args.composite, desired = ?args.desired, "rendering composite");
    let desired = render_desired(composer, &args)?;
    tracing::debug!(resources = desired.len(), "rendered desired resources");
    print!("{}", output::resources(&desired, format)?);
    Ok(())
}

/// Loads the inputs named by `args`, runs the function, and returns the
/// resulting desired resources.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded or the response is fatal.
pub fn render_desired(
    composer: &Composer,
    args: &RenderArgs,
) -> anyhow::Result<DesiredResources> {
    let composite: Map<String, Value> = input::load(&args.composite)?;
    let existing: Map<String, Value> = match &args.desired {
        Some(path) => input::load(path)?,
        None => Map::new(),
    };
    tracing::debug!(existing = existing.len(), "loaded existing desired resources");
    let req = build_request(composite, existing)?;

    let rsp = composer.run_function(&req);
    if let Some(message) = rsp.fatal_message() {
        anyhow::bail!("{message}");
    }
    Ok(rsp.desired.resources)
}

/// Wraps a composite and existing desired bodies into a request.
fn build_request(
    composite: Map<String, Value>,
    existing: Map<String, Value>,
) -> anyhow::Result<RunFunctionRequest> {
    let mut req = RunFunctionRequest::default();
    req.observed.composite = Some(Resource::new(composite));
    for (name, body) in existing {
        let Value::Object(body) = body else {
            anyhow::bail!("desired resource \"{name}\" is not an object");
        };
        let _ = req
            .desired
            .resources
            .insert(name.as_str().into(), Resource::new(body));
    }
    Ok(req)
}
