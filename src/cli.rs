//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! maxent-persist info model.txt.gz
//! maxent-persist info model.txt --format json
//! maxent-persist convert model.txt model.txt.gz
//! maxent-persist convert model.txt.gz model.bin --compression zstd --level 19
//! maxent-persist verify model.txt.gz
//! ```

use crate::io::{Compression, GisModel, SaveConfig};
use crate::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// maxent-persist: save, load and convert GIS maximum-entropy models
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "maxent-persist")]
#[command(version)]
#[command(about = "Inspect, convert and verify persisted GIS maximum-entropy models")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print a summary of a persisted model
    Info(InfoArgs),

    /// Re-encode a model, e.g. to change its compression
    Convert(ConvertArgs),

    /// Check that a model survives a save/load round trip unchanged
    Verify(VerifyArgs),
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to model file
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the convert command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ConvertArgs {
    /// Model to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination; compression follows its suffix unless overridden
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// YAML save configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override compression (none, gzip, zstd)
    #[arg(long)]
    pub compression: Option<Compression>,

    /// Override compression level
    #[arg(short, long, allow_negative_numbers = true)]
    pub level: Option<i32>,
}

/// Arguments for the verify command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct VerifyArgs {
    /// Path to model file
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown output format: {}. Valid formats: text, json",
                s
            )),
        }
    }
}

/// Parse command line arguments
pub fn parse_args<I, T>(args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Build the save configuration for a convert: file config first, then flags
pub fn save_config_for(args: &ConvertArgs) -> Result<SaveConfig> {
    let mut config = match &args.config {
        Some(path) => SaveConfig::load(path)?,
        None => SaveConfig::default(),
    };
    if let Some(compression) = args.compression {
        config.compression = Some(compression);
    }
    if let Some(level) = args.level {
        config.level = Some(level);
    }
    Ok(config)
}

/// Shape of a model, as reported by `info`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub correction_constant: i64,
    pub correction_parameter: f64,
    pub outcomes: usize,
    pub predicates: usize,
    pub active_parameters: usize,
    pub outcome_labels: Vec<String>,
}

impl ModelSummary {
    pub fn from_model(model: &GisModel) -> Self {
        Self {
            correction_constant: model.correction_constant(),
            correction_parameter: model.correction_parameter(),
            outcomes: model.num_outcomes(),
            predicates: model.num_predicates(),
            active_parameters: model.num_active_parameters(),
            outcome_labels: model.outcome_labels().to_vec(),
        }
    }

    pub fn to_text(&self) -> String {
        format!(
            "Correction constant: {}\n\
             Correction parameter: {}\n\
             Outcomes: {} ({})\n\
             Predicates: {}\n\
             Active parameters: {}",
            self.correction_constant,
            self.correction_parameter,
            self.outcomes,
            self.outcome_labels.join(", "),
            self.predicates,
            self.active_parameters,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ActiveOutcome;
    use crate::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_info_command() {
        let cli = parse_args(["maxent-persist", "info", "model.txt"]).unwrap();
        match cli.command {
            Command::Info(args) => {
                assert_eq!(args.model, PathBuf::from("model.txt"));
                assert_eq!(args.format, OutputFormat::Text);
            }
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_parse_info_json() {
        let cli = parse_args(["maxent-persist", "info", "m.gz", "--format", "JSON"]).unwrap();
        match cli.command {
            Command::Info(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_parse_convert_with_overrides() {
        let cli = parse_args([
            "maxent-persist",
            "convert",
            "in.txt",
            "out.bin",
            "--compression",
            "zstd",
            "--level",
            "-3",
        ])
        .unwrap();

        match cli.command {
            Command::Convert(args) => {
                assert_eq!(args.input, PathBuf::from("in.txt"));
                assert_eq!(args.output, PathBuf::from("out.bin"));
                assert_eq!(args.compression, Some(Compression::Zstd));
                assert_eq!(args.level, Some(-3));
                assert_eq!(args.config, None);
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = parse_args(["maxent-persist", "verify", "m.txt", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(matches!(cli.command, Command::Verify(_)));
    }

    #[test]
    fn test_parse_rejects_unknown_compression() {
        let result = parse_args([
            "maxent-persist",
            "convert",
            "a",
            "b",
            "--compression",
            "lzma",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(parse_args(["maxent-persist"]).is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    fn convert_args(config: Option<PathBuf>) -> ConvertArgs {
        ConvertArgs {
            input: PathBuf::from("in.txt"),
            output: PathBuf::from("out.txt"),
            config,
            compression: None,
            level: None,
        }
    }

    #[test]
    fn test_save_config_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "compression: gzip\nlevel: 3").unwrap();

        let mut args = convert_args(Some(file.path().to_path_buf()));
        args.level = Some(9);

        let config = save_config_for(&args).unwrap();
        assert_eq!(config.compression, Some(Compression::Gzip));
        assert_eq!(config.level, Some(9));
    }

    #[test]
    fn test_save_config_without_file() {
        let config = save_config_for(&convert_args(None)).unwrap();
        assert_eq!(config, SaveConfig::default());
    }

    #[test]
    fn test_save_config_bad_file() {
        let args = convert_args(Some(PathBuf::from("/nonexistent/config.yaml")));
        assert!(matches!(save_config_for(&args), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_model_summary() {
        let model = GisModel::new(
            5,
            0.25,
            vec!["yes".to_string(), "no".to_string()],
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![ActiveOutcome::new(0, 1.0), ActiveOutcome::new(1, 2.0)],
                vec![ActiveOutcome::new(1, 3.0)],
            ],
        )
        .unwrap();

        let summary = ModelSummary::from_model(&model);
        assert_eq!(summary.active_parameters, 3);
        assert!(summary.to_text().contains("Outcomes: 2 (yes, no)"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["predicates"], serde_json::json!(2));
        assert_eq!(json["correction_parameter"], serde_json::json!(0.25));
    }
}
