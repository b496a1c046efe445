//! `nwv run`: Run the function on a full request and print the response.

use clap::Args;
use netweave_compose::{Composer, RunFunctionRequest};

use crate::input;
use crate::output::{self, OutputFormat};

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the request document (JSON or YAML), or `-` for stdin.
    #[arg(default_value = input::STDIN)]
    pub request: String,
}

/// Executes the `run` command.
///
/// The response is printed even when it is fatal; the command then fails
/// with the fatal message so scripts can detect it.
///
/// # Errors
///
/// Returns an error if the request cannot be loaded, the response cannot
/// be serialized, or the response is fatal.
pub fn execute(
    composer: &Composer,
    args: RunArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    tracing::info!(path = %args.request, "running function on request");
    let req: RunFunctionRequest = input::load(&args.request)?;
    let rsp = composer.run_function(&req);
    tracing::debug!(
        resources = rsp.desired.resources.len(),
        fatal = rsp.is_fatal(),
        "response ready"
    );

    print!("{}", output::document(&rsp, format)?);

    if let Some(message) = rsp.fatal_message() {
        anyhow::bail!("function returned a fatal result: {message}");
    }
    Ok(())
}
