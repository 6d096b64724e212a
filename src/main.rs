#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use munge::config::{MungeConfig, load_or_default};
use munge::core::{ExecutionRequest, pair_tokens, parse_seed};
use munge::engine::Engine;
use munge::processor::{CancelToken, ProcessorRegistry};
use munge::report::{format_results, render_summary};
use munge::storage::{RunHistory, write_json};
use munge::{MungeError, MungeResult};

#[derive(Parser, Debug)]
#[command(name = "munge")]
#[command(about = "Process previously collected data", long_about = None)]
struct Cli {
    /// Enable debug logging (or set MUNGE_LOG)
    #[arg(long, global = true)]
    log_verbose: bool,

    /// Config file (default: munge.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a processor over collected data, e.g. `munge process stats srs 0 srs 1`
    Process {
        /// Processor to use
        processor: String,
        /// Data to process, as collector/key pairs: srs 0 srs 1 srs 3
        #[arg(required = true, num_args = 1.., value_name = "INPUT")]
        input: Vec<String>,
        /// Fixed seed for all pseudo-random number generators (any 64-bit
        /// integer; negative seeds wrap to unsigned)
        #[arg(short = 's', long, value_parser = parse_seed, allow_negative_numbers = true)]
        prngs_seed: Option<u64>,
        /// 0 = condensed, 1 = expanded, 4+ = debugging info
        #[arg(short, long)]
        verbosity: Option<u8>,
        /// How many decimal digits of floats to print
        #[arg(short, long)]
        precision: Option<usize>,
        /// Write machine-readable JSON record to this file
        #[arg(long)]
        json: Option<PathBuf>,
        /// Append the run record to this JSONL history
        #[arg(long)]
        jsonl: Option<PathBuf>,
    },

    /// List available processors
    Processors,

    /// List collectors and their data keys
    Collectors,
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("MUNGE_LOG").unwrap_or_else(|_| {
        if verbose { "munge=debug".to_string() } else { "munge=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn build_engine(cfg: &MungeConfig) -> MungeResult<Engine> {
    Ok(Engine::new(ProcessorRegistry::with_builtins(), cfg.resolver()?))
}

#[allow(clippy::too_many_arguments)]
fn run_process(
    cfg: &MungeConfig,
    processor: String,
    input: Vec<String>,
    prngs_seed: Option<u64>,
    verbosity: Option<u8>,
    precision: Option<usize>,
    json: Option<PathBuf>,
    jsonl: Option<PathBuf>,
) -> MungeResult<()> {
    let engine = build_engine(cfg)?;
    if !engine.registry().contains(&processor) {
        return Err(MungeError::Message(format!(
            "invalid processor '{}' (choose from: {})",
            processor,
            engine.registry().names().join(", ")
        )));
    }

    let verbosity = verbosity.unwrap_or(cfg.defaults.verbosity);
    let precision = precision.or(cfg.defaults.precision);

    let mut request = ExecutionRequest::new(processor, pair_tokens(&input)?).with_verbosity(verbosity);
    request.seed = prngs_seed;
    request.precision = precision;

    let execution = engine.execute_with_cancel(&request, &CancelToken::new())?;

    if let Some(path) = json {
        write_json(&path, &execution.record())?;
    }
    if let Some(path) = jsonl {
        let history = RunHistory::new(path);
        history.append(&execution.record())?;
        info!(path = %history.path().display(), runs = history.len()?, "recorded run");
    }

    let results = format_results(&execution.results, verbosity, precision)?;
    if verbosity == 0 {
        println!("{}", results.trim());
    } else {
        print!("{}", render_summary(&execution.info, &results, precision));
    }
    Ok(())
}

fn list_processors() {
    let registry = ProcessorRegistry::with_builtins();
    for processor in registry.iter() {
        println!(
            "{:<12} {:<12} {}",
            processor.name(),
            processor.arity().to_string(),
            processor.description()
        );
    }
}

fn list_collectors(cfg: &MungeConfig) -> MungeResult<()> {
    let resolver = cfg.resolver()?;
    for name in resolver.names() {
        let keys = resolver.keys(name)?;
        println!("{}: {}", name, keys.join(" "));
    }
    Ok(())
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_verbose);

    let result = load_or_default(cli.config.as_deref()).and_then(|cfg| match cli.command {
        Commands::Process { processor, input, prngs_seed, verbosity, precision, json, jsonl } => {
            run_process(&cfg, processor, input, prngs_seed, verbosity, precision, json, jsonl)
        }
        Commands::Processors => {
            list_processors();
            Ok(())
        }
        Commands::Collectors => list_collectors(&cfg),
    });

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_of(args: &[&str]) -> Option<u64> {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Process { prngs_seed, .. } => prngs_seed,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_negative_seed_is_accepted() {
        assert_eq!(seed_of(&["munge", "process", "-s", "-1", "stats", "srs", "0"]), Some(u64::MAX));
        assert_eq!(seed_of(&["munge", "process", "stats", "srs", "0", "--prngs-seed", "7"]), Some(7));
        assert_eq!(seed_of(&["munge", "process", "stats", "srs", "0"]), None);
    }

    #[test]
    fn test_non_integer_seed_is_rejected() {
        assert!(Cli::try_parse_from(["munge", "process", "-s", "x", "stats", "srs", "0"]).is_err());
    }
}
