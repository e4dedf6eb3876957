//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Turn flat parent-pointer JSON records into nested trees and back
#[derive(Parser, Debug)]
#[command(name = "listtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Directory holding the local .listtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Print JSON on one line
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Field name overrides shared by the data commands.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Identifier field
    #[arg(long)]
    pub id: Option<String>,

    /// Parent identifier field
    #[arg(long)]
    pub pid: Option<String>,

    /// Children field
    #[arg(long)]
    pub children: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a nested forest from flat records
    Build {
        /// JSON array of records ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        fields: FieldArgs,
        /// Order siblings by this field
        #[arg(long)]
        sort_by: Option<String>,
        /// Fail on duplicate identifiers or parent cycles
        #[arg(long)]
        strict: bool,
    },

    /// Flatten a nested forest in pre-order
    Flatten {
        /// JSON forest ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List identifiers to expand down to a depth
    Expand {
        /// JSON forest ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Deepest level to include (roots are level 1)
        #[arg(long, allow_negative_numbers = true)]
        depth: Option<i64>,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Sort every level of a nested forest
    Sort {
        /// JSON forest ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Field to order siblings by
        #[arg(long)]
        by: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Build and draw the hierarchy as a tree
    Tree {
        /// JSON array of records ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Field shown for each node
        #[arg(long)]
        label: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Report duplicates, unknown parents and cycles
    Validate {
        /// JSON array of records ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
