//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "wav-channel-combiner",
    version,
    about = "Merge mono/stereo WAV files into one multichannel WAV using ffmpeg",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show channel count, duration, sample rate and bit depth of each file
    Probe(ProbeArgs),
    /// Merge the files, in order, into one multichannel WAV
    Combine(CombineArgs),
    /// Build a job interactively
    Shell(ShellArgs),
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Files to inspect
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CombineArgs {
    /// Destination file (defaults to the configured file name in the last
    /// used output directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Replace the destination if it exists
    #[arg(long)]
    pub overwrite: bool,

    /// Input files; their order sets the channel order
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Files to start with
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}
