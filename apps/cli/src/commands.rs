//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use pipeverb_core::{Args, VerbRegistry, datum_from_json};
use pipeverb_shared::{
    AppConfig, OutputFormat, StepSpec, init_config, load_config, load_config_from, render_config,
};
use serde_json::Value;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pipeverb — pipe JSON data through type-dispatched verbs.
#[derive(Parser)]
#[command(
    name = "pipeverb",
    version,
    about = "Pipe JSON data through a left-to-right chain of type-dispatched verbs.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.pipeverb/pipeverb.toml.
    #[arg(long, global = true, env = "PIPEVERB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run a pipeline over a JSON value.
    Run {
        /// JSON input file, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Named pipeline from the config file; runs before any --step.
        #[arg(short, long)]
        pipeline: Option<String>,

        /// Pipeline stage, e.g. `groupby:b` or `append_col:x=5` (repeatable).
        #[arg(short, long = "step")]
        steps: Vec<String>,

        /// Print single-line JSON regardless of the configured output format.
        #[arg(long)]
        compact: bool,
    },

    /// List built-in verbs and the types each one is specialized for.
    Verbs,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays
/// clean JSON.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pipeverb=info",
        1 => "pipeverb=debug",
        _ => "pipeverb=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Run {
            input,
            pipeline,
            steps,
            compact,
        } => cmd_run(config_path, &input, pipeline.as_deref(), &steps, compact),
        Command::Verbs => cmd_verbs(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    })
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_run(
    config_path: Option<&Path>,
    input: &str,
    pipeline: Option<&str>,
    raw_steps: &[String],
    compact: bool,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let steps = resolve_steps(&config, pipeline, raw_steps)?;

    let value = read_input(input)?;
    let datum = datum_from_json(value)?;

    info!(input, steps = steps.len(), input_type = datum.type_name(), "running pipeline");

    let registry = VerbRegistry::with_builtins();
    let output = registry.run(datum, &steps)?;
    let rendered = registry
        .get("to_json")?
        .invoke(output, &Args::new())?
        .downcast::<Value>()?;

    let format = if compact {
        OutputFormat::Compact
    } else {
        config.defaults.output
    };
    println!("{}", render_output(&rendered, format)?);

    Ok(())
}

fn cmd_verbs() -> Result<()> {
    let registry = VerbRegistry::with_builtins();
    for verb in registry.verbs() {
        println!("{:<16} {}", verb.name(), verb.registered_types().join(", "));
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config written to {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    print!("{}", render_config(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Named pipeline steps first, then `--step` arguments in order.
fn resolve_steps(
    config: &AppConfig,
    pipeline: Option<&str>,
    raw_steps: &[String],
) -> Result<Vec<StepSpec>> {
    let mut steps = match pipeline {
        Some(name) => config.pipeline(name)?.steps.clone(),
        None => Vec::new(),
    };
    for raw in raw_steps {
        steps.push(raw.parse()?);
    }
    if steps.is_empty() {
        return Err(eyre!("no pipeline steps given; use --step or --pipeline"));
    }
    Ok(steps)
}

fn read_input(input: &str) -> Result<Value> {
    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).wrap_err_with(|| format!("failed to read '{input}'"))?
    };
    serde_json::from_str(&content).wrap_err_with(|| format!("input '{input}' is not valid JSON"))
}

fn render_output(value: &Value, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Compact => serde_json::to_string(value)?,
    })
}
