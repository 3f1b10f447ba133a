pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ecc")]
#[command(about = "Serve claim-protected substitution codebooks")]
pub struct Args {
    /// Path to the ecc config directory (defaults to ~/.ecc)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
