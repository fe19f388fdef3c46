//! maxent-persist CLI
//!
//! # Usage
//!
//! ```bash
//! # Summarize a model
//! maxent-persist info model.txt.gz
//!
//! # Compress a plain-text model
//! maxent-persist convert model.txt model.txt.gz
//!
//! # Check that a model round-trips
//! maxent-persist verify model.txt.gz
//! ```

use clap::Parser;
use maxent_persist::cli::{save_config_for, Cli, Command, ModelSummary, OutputFormat};
use maxent_persist::io::{from_text, load_model, save_model, to_text};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };
    init_tracing(log_level);

    let result = match cli.command {
        Command::Info(args) => run_info(args, log_level),
        Command::Convert(args) => run_convert(args, log_level),
        Command::Verify(args) => run_verify(args, log_level),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

/// Library events go to stderr; `RUST_LOG` takes precedence over the flags
fn init_tracing(level: LogLevel) {
    let default = match level {
        LogLevel::Quiet => "maxent_persist=error",
        LogLevel::Normal => "maxent_persist=info",
        LogLevel::Verbose => "maxent_persist=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_info(args: maxent_persist::cli::InfoArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Verbose,
        &format!("Loading model: {}", args.model.display()),
    );

    let model = load_model(&args.model).map_err(|e| format!("Load error: {e}"))?;
    let summary = ModelSummary::from_model(&model);

    match args.format {
        OutputFormat::Text => println!("{}", summary.to_text()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_convert(args: maxent_persist::cli::ConvertArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Converting {} -> {}",
            args.input.display(),
            args.output.display()
        ),
    );

    let config = save_config_for(&args).map_err(|e| format!("Config error: {e}"))?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Compression: {:?}", config.compression_for(&args.output)),
    );

    let model = load_model(&args.input).map_err(|e| format!("Load error: {e}"))?;
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Outcomes: {}, predicates: {}",
            model.num_outcomes(),
            model.num_predicates()
        ),
    );

    save_model(&model, &args.output, &config).map_err(|e| format!("Save error: {e}"))?;

    log(level, LogLevel::Normal, "Conversion complete");
    Ok(())
}

fn run_verify(args: maxent_persist::cli::VerifyArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Verifying model: {}", args.model.display()),
    );

    let model = load_model(&args.model).map_err(|e| format!("Load error: {e}"))?;
    let text = to_text(&model).map_err(|e| format!("Encode error: {e}"))?;
    let reloaded = from_text(&text).map_err(|e| format!("Decode error: {e}"))?;

    if reloaded != model {
        return Err("model changed after a save/load round trip".to_string());
    }

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  {} outcomes, {} predicates, {} active parameters",
            model.num_outcomes(),
            model.num_predicates(),
            model.num_active_parameters()
        ),
    );
    log(level, LogLevel::Normal, "Model is valid");
    Ok(())
}
