//! CLI module for clusterforge
//!
//! Subcommands:
//! - `clusterforge compile` - Compile a request into a bundle on disk
//! - `clusterforge validate` - Run the compiler without writing anything
//! - `clusterforge versions` - Show or edit the runtime compatibility table

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;

pub use commands::*;
pub use display::*;

#[derive(Parser, Debug)]
#[command(name = "clusterforge")]
#[command(about = "Compile Kubernetes cluster topologies into provisioning artifacts")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: ~/.clusterforge/config.yaml)
    #[arg(long, global = true, env = "CLUSTERFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to a .env file providing `$env.` credential references
    #[arg(long, value_name = "FILE", global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a request and write the bundle
    Compile(CompileArgs),

    /// Check a request compiles, without writing anything
    Validate(ValidateArgs),

    /// Manage the Kubernetes/runtime compatibility table
    Versions(VersionsArgs),
}

/// Arguments for the compile command
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Path to the request file (JSON or YAML)
    pub file: PathBuf,

    /// Output directory (default: `output-dir` from config, else ./dist)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the request file
    pub file: PathBuf,
}

/// Arguments for the versions command
#[derive(Parser, Debug)]
pub struct VersionsArgs {
    #[command(subcommand)]
    pub action: Option<VersionsAction>,
}

#[derive(Subcommand, Debug)]
pub enum VersionsAction {
    /// List the table in effect (default)
    List,

    /// Add or replace a pair in the config file
    Add {
        /// Kubernetes package version, e.g. 1.33.1-1.1
        k8s_version: String,
        /// Container runtime version, e.g. 1.33
        cri_version: String,
    },

    /// Remove a pair from the config file
    Remove {
        /// Kubernetes package version
        k8s_version: String,
    },
}
