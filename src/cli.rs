//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{RunConfig, DEFAULT_ALGORITHM, DEFAULT_POOL_SIZE};
use crate::hash::error::Result;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "treehash",
    version,
    about = "Compute content digests for every file under a directory tree"
)]
pub struct Cli {
    /// Directory to process
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Number of concurrent workers (0 or less for unlimited)
    #[arg(short, long, default_value_t = DEFAULT_POOL_SIZE, allow_negative_numbers = true)]
    pub poolsize: i64,

    /// Hash the targets of symbolic links instead of skipping them
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Hash algorithm (see --list); unsupported names fall back to sha256
    #[arg(long = "hash", default_value = DEFAULT_ALGORITHM)]
    pub hash: String,

    /// Exclude paths matching this regular expression
    #[arg(short = 'x', long)]
    pub exclude: Option<String>,

    /// List supported algorithms and exit
    #[arg(long)]
    pub list: bool,

    /// Print the algorithm list as JSON
    #[arg(long, requires = "list")]
    pub json: bool,

    /// More diagnostics (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Validate the parsed options into a run configuration
    pub fn to_config(&self) -> Result<RunConfig> {
        RunConfig::resolve(
            &self.dir,
            self.poolsize,
            self.follow_symlinks,
            &self.hash,
            self.exclude.as_deref(),
        )
    }
}
