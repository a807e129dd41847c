//! embed-driver: runs the UltraFeedback embedding generator over dataset subsets.
//!
//! A named mode selects a family of dataset subsets and the suffix used for
//! its directories. The driver then calls an external processing entry point
//! once per (subset, split) pair, test before train, in subset order.
//!
//! # Modules
//!
//! - [`mode`]: Modes and their subset lookup table
//! - [`plan`]: Building the ordered list of invocations
//! - [`driver`]: Sequential execution against a [`driver::DataProcessor`]
//! - [`processor`]: Subprocess-backed processor
//! - [`config`]: Layered run settings
//! - [`error`]: Error types for embed-driver operations

pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod mode;
pub mod plan;
pub mod processor;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::{DriverError, ProcessingError};

use config::{DriverConfig, ProcessorConfig, RunSettings};
use driver::{FailurePolicy, RunReport};
use mode::Mode;
use processor::CommandProcessor;

/// The embed-driver CLI application.
#[derive(Parser)]
#[command(name = "embed-driver")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List the supported modes with their subsets and suffixes.
    Modes(ModesArgs),
    /// Print the planned invocations without running them.
    Plan(PlanArgs),
    /// Run the processor for every planned invocation.
    Run(RunArgs),
}

/// Arguments for the modes subcommand.
#[derive(clap::Args)]
struct ModesArgs {
    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Settings shared by plan and run.
#[derive(clap::Args)]
struct SettingsArgs {
    /// YAML config file; flags and environment variables override it.
    #[arg(long, env = "EMBED_DRIVER_CONFIG")]
    config: Option<PathBuf>,

    /// Mode ('ultra_feedback', 'pos_neg', 'set', or 'single').
    #[arg(long, env = "EMBED_DRIVER_MODE")]
    mode: Option<String>,

    /// Model type passed to the processor ('gpt2' or 'llama').
    #[arg(long, env = "EMBED_DRIVER_MODEL_TYPE")]
    model_type: Option<String>,

    /// Value passed through as --other_subsets.
    #[arg(long, env = "EMBED_DRIVER_OTHER_SUBSETS")]
    other_subsets: Option<String>,

    /// Directory holding the UltraFeedback datasets.
    #[arg(long, env = "EMBED_DRIVER_DATA_ROOT")]
    data_root: Option<String>,

    /// Program that runs the processing entry point.
    #[arg(long, env = "EMBED_DRIVER_PROCESSOR")]
    processor: Option<String>,

    /// Argument placed before the per-invocation arguments (repeatable).
    #[arg(long = "processor-arg", value_name = "ARG", allow_hyphen_values = true)]
    processor_args: Vec<String>,

    /// Only process this subset (repeatable).
    #[arg(long = "subset", value_name = "ID")]
    subsets: Vec<String>,
}

/// Arguments for the plan subcommand.
#[derive(clap::Args)]
struct PlanArgs {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the run subcommand.
#[derive(clap::Args)]
struct RunArgs {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Keep running after a failed invocation instead of stopping.
    #[arg(long)]
    keep_going: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(DriverError::UnsupportedOutput(format!(
                "'{}' (supported: text, json)",
                other
            ))),
        }
    }
}

/// Run the embed-driver CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), DriverError> {
    logging::init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Modes(args)) => run_modes(args),
        Some(Commands::Plan(args)) => run_plan(args),
        Some(Commands::Run(args)) => run_run(args),
        None => {
            println!("embed-driver {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Runs the embedding generator over dataset subsets.");
            println!();
            println!("Run 'embed-driver --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the modes subcommand.
fn run_modes(args: ModesArgs) -> Result<(), DriverError> {
    let output: OutputFormat = args.output.parse()?;
    let table: Vec<_> = Mode::ALL.into_iter().map(mode::resolve).collect();

    match output {
        OutputFormat::Json => print_json(&table)?,
        OutputFormat::Text => {
            for resolved in &table {
                let suffix = if resolved.suffix.is_empty() {
                    "(none)"
                } else {
                    resolved.suffix.as_str()
                };
                println!(
                    "{:<15} {:<10} {}",
                    resolved.mode.name(),
                    suffix,
                    resolved.subsets.join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Execute the plan subcommand.
fn run_plan(args: PlanArgs) -> Result<(), DriverError> {
    let output: OutputFormat = args.output.parse()?;
    let settings = load_settings(args.settings)?;
    let plan = plan::build_plan(&mode::resolve(settings.mode), &settings.plan)?;

    match output {
        OutputFormat::Json => print_json(&plan)?,
        OutputFormat::Text => {
            for params in &plan {
                println!("{}", settings.processor.command_line(params));
            }
        }
    }

    Ok(())
}

/// Execute the run subcommand.
fn run_run(args: RunArgs) -> Result<(), DriverError> {
    let output: OutputFormat = args.output.parse()?;
    let settings = load_settings(args.settings)?;
    let plan = plan::build_plan(&mode::resolve(settings.mode), &settings.plan)?;

    let policy = if args.keep_going {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::FailFast
    };
    let mut processor = CommandProcessor::new(settings.processor);

    let result = driver::run(&plan, &mut processor, policy);
    match &result {
        Ok(report) | Err(DriverError::RunFailed { report, .. }) => print_report(report, output)?,
        Err(_) => {}
    }

    result.map(|_| ())
}

/// Merge the config file, environment and flags into run settings.
fn load_settings(args: SettingsArgs) -> Result<RunSettings, DriverError> {
    let file = match &args.config {
        Some(path) => DriverConfig::from_yaml_file(path)?,
        None => DriverConfig::default(),
    };

    let processor = ProcessorConfig {
        program: args.processor,
        args: if args.processor_args.is_empty() {
            None
        } else {
            Some(args.processor_args)
        },
    };

    let flags = DriverConfig {
        mode: args.mode,
        model_type: args.model_type,
        other_subsets: args.other_subsets,
        data_root: args.data_root,
        processor,
        subsets: args.subsets,
    };

    let settings = flags.merged_over(file).into_settings()?;
    tracing::debug!(?settings, "resolved settings");
    Ok(settings)
}

fn print_report(report: &RunReport, output: OutputFormat) -> Result<(), DriverError> {
    match output {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            print!("{}", report);
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), DriverError> {
    let json = serde_json::to_string_pretty(value).map_err(DriverError::ReportSerialize)?;
    println!("{}", json);
    Ok(())
}
