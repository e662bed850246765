use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Utility-Class Scanner CLI - Discovers candidate class tokens in source files
#[derive(Parser, Debug)]
#[command(name = "class-scanner-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan source files for utility-class candidates
    Scan(ScanArgs),
    /// Read source content from stdin and write candidates to stdout
    Pipe(PipeArgs),
}

/// Arguments for the scan command
#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    /// Input files to scan
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        required = true,
        num_args = 1..,
        help = "Source files to scan for utility-class candidates"
    )]
    pub input: Vec<PathBuf>,

    /// Output token list path
    #[arg(
        short = 'o',
        long = "output-tokens",
        value_name = "PATH",
        required = true,
        help = "Path where the candidate token list (one per line) will be written"
    )]
    pub output_tokens: PathBuf,

    /// Output report file path (JSON)
    #[arg(
        short = 'r',
        long = "output-report",
        value_name = "PATH",
        required = true,
        help = "Path where the JSON report will be written"
    )]
    pub output_report: PathBuf,

    /// Configuration file path
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Path to configuration file (YAML or JSON format)"
    )]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose output"
    )]
    pub verbose: bool,

    /// Number of parallel threads to use
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "NUM",
        help = "Number of parallel threads to use (defaults to number of CPU cores)"
    )]
    pub jobs: Option<usize>,

    /// Exclude patterns (glob patterns to exclude)
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "PATTERN",
        num_args = 0..,
        help = "Patterns to exclude from scanning"
    )]
    pub exclude: Vec<String>,

    /// Dry run (don't write output files)
    #[arg(
        long = "dry-run",
        default_value_t = false,
        help = "Perform the scan but don't write output files"
    )]
    pub dry_run: bool,
}

/// Arguments for the pipe command
#[derive(Parser, Debug, Clone)]
pub struct PipeArgs {
    /// File-type tag used to select the extraction rule
    #[arg(
        short = 't',
        long = "file-type",
        value_name = "EXT",
        default_value = "rs",
        help = "File-type tag used to select the extraction rule"
    )]
    pub file_type: String,

    /// Emit a JSON report instead of plain tokens
    #[arg(
        long = "json",
        default_value_t = false,
        help = "Emit a JSON report instead of one token per line"
    )]
    pub json: bool,
}

impl ScanArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        // Check that input paths are not empty
        if self.input.is_empty() {
            return Err("At least one input file must be provided".to_string());
        }

        // Check that output paths are not the same
        if self.output_tokens == self.output_report {
            return Err("Output token and report paths must be different".to_string());
        }

        // Validate number of jobs if specified
        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err("Number of jobs must be at least 1".to_string());
            }
        }

        Ok(())
    }
}
