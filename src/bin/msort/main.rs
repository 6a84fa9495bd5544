mod logger;
mod msort;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use media_sorter::media_sort::Category;

use crate::msort::Msort;

#[derive(Parser)]
#[command(author, version, name = env!("CARGO_BIN_NAME"), about = "Sort media files into folders named after their titles")]
pub(crate) struct Args {
    /// Optional input directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Only sort the given file types
    #[arg(short = 't', long = "type", num_args = 1, action = clap::ArgAction::Append, name = "TYPE")]
    types: Vec<Category>,

    /// Auto-confirm all prompts without asking
    #[arg(short, long)]
    auto: bool,

    /// Print debug information
    #[arg(short = 'D', long)]
    debug: bool,

    /// Write a log file of the run
    #[arg(short = 'L', long)]
    log: bool,

    /// Path to the native title cleaner library
    #[arg(long, name = "LIBRARY", value_hint = clap::ValueHint::FilePath)]
    native: Option<PathBuf>,

    /// Only print changes without moving files
    #[arg(short, long)]
    print: bool,

    /// Show target folders before sorting
    #[arg(short = 'P', long)]
    preview: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        media_sorter::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        Msort::new(args)?.run()
    }
}
