use clap::Parser;
use std::path::PathBuf;

use crate::wad::ExtractOptions;

#[derive(Parser, Debug)]
#[command(name = "wadx")]
#[command(version)]
#[command(about = "List, read and extract WWAD archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  wadx LegoRR1.wad                     extract everything into ./LegoRR1\n  \
  wadx -p LegoRR1.wad credits.txt      print credits.txt to stdout\n  \
  wadx -l LegoRR1.wad                  list files in the archive")]
pub struct Cli {
    /// WAD archive path
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Relative paths to extract (default: all)
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely with version, size, offset and original path
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract files into exdir (default: archive name without .wad)
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<PathBuf>,

    /// Number of objects extracted concurrently
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "N",
        default_value_t = ExtractOptions::default().concurrency
    )]
    pub jobs: usize,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Default log level for the subscriber when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.is_very_quiet() {
            "error"
        } else if self.is_quiet() {
            "warn"
        } else {
            "info"
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            concurrency: self.jobs.max(1),
        }
    }
}
