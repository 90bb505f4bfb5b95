//! CLI argument definitions using clap.
//!
//! tysnap is a single-command tool: it takes a source locator
//! (`path/to/module.ts:TypeName`) and writes one generated file.

use std::path::PathBuf;

use clap::{Args, Parser};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Declaration to extract, as path/to/module.ts:TypeName
    pub source: String,

    /// Output file path (default: <typename>.ts in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Namespace for the generated declarations (default: inferred from
    /// sibling files of the output, then the output directory name)
    #[arg(long)]
    pub namespace: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments shared with the analysis context.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
