//! CLI command definitions and dispatch.

pub mod plan;
pub mod render;
pub mod run;

use clap::{Parser, Subcommand, ValueEnum};
use netweave_common::config::ComposerConfig;
use netweave_common::constants;
use netweave_compose::Composer;

use crate::output::OutputFormat;

/// netweave: compose VPC and internet gateway resources from a network declaration.
#[derive(Parser, Debug)]
#[command(name = constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Output format for documents written to stdout [default: yaml].
    /// `plan` prints text unless a format is given.
    #[arg(long, short, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Response time-to-live in seconds.
    #[arg(long, global = true, env = "NETWEAVE_TTL", default_value_t = constants::DEFAULT_TTL_SECS)]
    pub ttl: u64,

    /// Region used when the composite leaves `spec.region` empty.
    #[arg(long, global = true, env = "NETWEAVE_DEFAULT_REGION", default_value = constants::DEFAULT_REGION)]
    pub default_region: String,

    /// Provider config used when the composite leaves `spec.providerConfigName` empty.
    #[arg(
        long,
        global = true,
        env = "NETWEAVE_DEFAULT_PROVIDER_CONFIG",
        default_value = constants::DEFAULT_PROVIDER_CONFIG
    )]
    pub default_provider_config: String,
}

impl Cli {
    /// Builds the composer configuration from the global flags.
    #[must_use]
    pub fn composer_config(&self) -> ComposerConfig {
        ComposerConfig {
            ttl_secs: self.ttl,
            default_region: self.default_region.clone(),
            default_provider_config: self.default_provider_config.clone(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the function on a full request and print the response.
    Run(run::RunArgs),
    /// Render the desired resources for a composite resource.
    Render(render::RenderArgs),
    /// Show the rendered resources in provisioning order with their selector bindings.
    Plan(plan::PlanArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let composer = Composer::new(cli.composer_config());
    let format = cli.output.unwrap_or_default();
    match cli.command {
        Command::Run(args) => run::execute(&composer, args, format),
        Command::Render(args) => render::execute(&composer, args, format),
        Command::Plan(args) => plan::execute(&composer, args, cli.output),
    }
}
