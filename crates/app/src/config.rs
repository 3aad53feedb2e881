//! Configuration for the huffc application.
//!
//! Command-line arguments are parsed with clap and then resolved into a
//! [`Config`], filling in defaults (including a time-based seed for sample
//! data) so that every run can be reproduced from its printed configuration.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use huffman_core::{Error, Result};

/// Default size of generated sample data (1 MiB).
pub const DEFAULT_SAMPLE_SIZE: usize = 1024 * 1024;

#[derive(Debug, Parser)]
#[command(name = "huffc")]
#[command(about = "Static and adaptive Huffman compression")]
pub struct Cli {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    pub log: String,

    /// Print the resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Don't print the metrics summary
    #[arg(long, global = true)]
    pub no_metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Compressed file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Two passes, canonical code-length table up front
    Static,
    /// One pass, no table, code adapts as data is seen
    Adaptive,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compress a file
    Compress {
        #[arg(long = "in")]
        input: PathBuf,
        #[arg(long = "out")]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = Mode::Static)]
        mode: Mode,
    },
    /// Decompress a file produced by `compress` with the same mode
    Decompress {
        #[arg(long = "in")]
        input: PathBuf,
        #[arg(long = "out")]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = Mode::Static)]
        mode: Mode,
    },
    /// Compress and decompress in memory and verify the result
    Roundtrip {
        /// Input file (default: generate sample data)
        #[arg(long = "in")]
        input: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Mode::Static)]
        mode: Mode,
        /// Seed for sample data
        #[arg(long)]
        seed: Option<u64>,
        /// Size of sample data in bytes
        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        size: usize,
    },
}

/// What a run does, with every default resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Compress { input: PathBuf, output: PathBuf },
    Decompress { input: PathBuf, output: PathBuf },
    Roundtrip { source: Source },
}

/// Where round-trip data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Sample { seed: u64, size: usize },
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub task: Task,
    pub mode: Mode,
    pub log_filter: String,
    pub print_config: bool,
    pub print_metrics: bool,
}

impl Config {
    /// Resolve parsed arguments into a run configuration.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let (task, mode) = match cli.command {
            Command::Compress { input, output, mode } => {
                check_distinct(&input, &output)?;
                (Task::Compress { input, output }, mode)
            }
            Command::Decompress { input, output, mode } => {
                check_distinct(&input, &output)?;
                (Task::Decompress { input, output }, mode)
            }
            Command::Roundtrip {
                input,
                mode,
                seed,
                size,
            } => {
                let source = match input {
                    Some(path) => Source::File(path),
                    None => Source::Sample {
                        seed: seed.unwrap_or_else(time_seed),
                        size,
                    },
                };
                (Task::Roundtrip { source }, mode)
            }
        };

        Ok(Config {
            task,
            mode,
            log_filter: cli.log,
            print_config: cli.print_config,
            print_metrics: !cli.no_metrics,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Mode: {:?}", self.mode);
        match &self.task {
            Task::Compress { input, output } => {
                println!("Task: compress");
                println!("Input file:  {}", input.display());
                println!("Output file: {}", output.display());
            }
            Task::Decompress { input, output } => {
                println!("Task: decompress");
                println!("Input file:  {}", input.display());
                println!("Output file: {}", output.display());
            }
            Task::Roundtrip { source } => {
                println!("Task: roundtrip");
                match source {
                    Source::File(path) => println!("Input file: {}", path.display()),
                    Source::Sample { seed, size } => {
                        println!("Input: generated sample");
                        println!("Seed: {}", seed);
                        println!("Size: {} bytes ({} KiB)", size, size / 1024);
                    }
                }
            }
        }
        println!("Log filter: {}", self.log_filter);
        println!();
    }
}

fn check_distinct(input: &Path, output: &Path) -> Result<()> {
    if input == output {
        return Err(Error::Config(format!(
            "input and output must be different files: {}",
            input.display()
        )));
    }
    Ok(())
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        let cli = Cli::try_parse_from(args).map_err(|e| Error::Config(e.to_string()))?;
        Config::from_cli(cli)
    }

    #[test]
    fn test_compress_defaults_to_static() {
        let config = parse(&["huffc", "compress", "--in", "a.txt", "--out", "a.huf"]).unwrap();
        assert_eq!(config.mode, Mode::Static);
        assert_eq!(
            config.task,
            Task::Compress {
                input: PathBuf::from("a.txt"),
                output: PathBuf::from("a.huf"),
            }
        );
        assert!(config.print_metrics);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_adaptive_mode_and_global_flags() {
        let config = parse(&[
            "huffc", "--no-metrics", "decompress", "--in", "a.huf", "--out", "a.txt", "--mode",
            "adaptive", "--log", "debug",
        ])
        .unwrap();
        assert_eq!(config.mode, Mode::Adaptive);
        assert!(!config.print_metrics);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_roundtrip_sample_with_seed() {
        let config = parse(&["huffc", "roundtrip", "--seed", "42", "--size", "100"]).unwrap();
        assert_eq!(
            config.task,
            Task::Roundtrip {
                source: Source::Sample { seed: 42, size: 100 }
            }
        );
    }

    #[test]
    fn test_roundtrip_default_size() {
        let config = parse(&["huffc", "roundtrip"]).unwrap();
        match config.task {
            Task::Roundtrip {
                source: Source::Sample { size, .. },
            } => assert_eq!(size, DEFAULT_SAMPLE_SIZE),
            other => panic!("unexpected task {:?}", other),
        }
    }

    #[test]
    fn test_same_input_and_output_rejected() {
        let result = parse(&["huffc", "compress", "--in", "x", "--out", "x"]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = parse(&["huffc", "compress", "--in", "a", "--out", "b", "--mode", "lz"]);
        assert!(result.is_err());
    }
}
