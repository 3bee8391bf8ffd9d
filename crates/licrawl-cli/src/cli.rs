//! CLI argument definitions for licrawl.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "licrawl",
    version,
    about = "License audit for the transitive dependencies of a Go module",
    long_about = "licrawl resolves every module a Go project depends on, directly or \
                  transitively, and reports the license of each one from the local module \
                  cache or a fresh clone of its repository."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (defaults to the nearest ancestor with a go.mod)
    #[arg(long, global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report the license of every dependency
    Licenses {
        /// Where the dependency set comes from
        #[arg(long, value_enum, default_value_t = DepSource::Sum)]
        from: DepSource,
        /// Number of modules processed in parallel
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Per-module clone timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Go module cache directory
        #[arg(long, value_name = "DIR")]
        modcache: Option<PathBuf>,
        /// Scratch directory for clones of uncached modules
        #[arg(long, value_name = "DIR")]
        repos_dir: Option<PathBuf>,
        /// Do not consult go-import meta tags when a clone fails
        #[arg(long)]
        no_meta: bool,
    },

    /// Resolve the dependency closure from go.mod and print a report
    Deps {
        /// Go module cache directory
        #[arg(long, value_name = "DIR")]
        modcache: Option<PathBuf>,
    },

    /// Print the go-import / go-source meta tags of a page as JSON
    Meta {
        /// Page URL, e.g. https://go.uber.org/zap?go-get=1
        url: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepSource {
    /// Every module listed in go.sum
    Sum,
    /// The closure resolved from go.mod through the module cache
    Mod,
}

pub fn parse() -> Cli {
    Cli::parse()
}
