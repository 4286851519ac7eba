use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffjob")]
#[command(about = "Build and run ffmpeg command lines from job files", long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the ffmpeg command for a job file without executing it
    DryRun {
        /// Job file (.toml, or .json)
        job: PathBuf,

        /// Print the argument list as a JSON array instead of a shell line
        #[arg(long)]
        json: bool,
    },

    /// Run a job file through ffmpeg
    Run {
        /// Job file (.toml, or .json)
        job: PathBuf,

        /// Kill ffmpeg after this many seconds (overrides config)
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Print live progress parsed from ffmpeg's status line
        #[arg(long)]
        progress: bool,
    },

    /// Parse a shorthand number such as 1.5Mi or 800K
    Number {
        text: String,
    },

    /// Check if ffmpeg is installed
    CheckFfmpeg,

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
