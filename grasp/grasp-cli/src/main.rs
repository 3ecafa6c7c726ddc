//! Antipodal grasp synthesis from the command line.
//!
//! # Commands
//!
//! - `grasp generate <MESH> -n <NUM>` - Sample grasps for a mesh and write a grasp set
//! - `grasp inspect <PATH>` - Summarize a grasp-set file, or every file for
//!   one object in a directory
//!
//! Set `RUST_LOG=debug` to see per-batch sampling progress.

mod generate;
mod inspect;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Antipodal grasp synthesis for parallel-jaw grippers
#[derive(Parser)]
#[command(name = "grasp")]
#[command(about = "Sample and inspect antipodal grasp poses", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample grasps for a mesh and write them as a grasp set
    Generate(generate::GenerateArgs),

    /// Summarize stored grasps
    Inspect {
        /// A grasp-set file, or a directory when used with --object
        #[arg(name = "PATH")]
        path: PathBuf,

        /// Gather every `<OBJECT>_*` file in the directory
        #[arg(long)]
        object: Option<String>,

        /// Number of grasps to list
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate::run(&args),
        Commands::Inspect {
            path,
            object,
            limit,
        } => inspect::run(&path, object.as_deref(), limit),
    }
}
