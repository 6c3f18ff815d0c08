//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Level experience curves: sunburst hierarchies, graded tables and chart data
#[derive(Parser, Debug)]
#[command(name = "expcurve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory game documents are resolved against (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub data_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List games in catalog order
    Games,

    /// Pick a game interactively (fzf) and show its table
    Select,

    /// Show the graded level table of a game
    Table {
        /// Game name or catalog position
        game: String,
    },

    /// Show the sunburst hierarchy of a game as a tree
    Tree {
        /// Game name or catalog position
        game: String,
    },

    /// Write the render-ready view of a game as JSON
    Export {
        /// Game name or catalog position
        game: String,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// List the references of every game
    References,

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
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Create a template config file
    Init {
        /// Create in the data root instead of the global config dir
        #[arg(short, long)]
        local: bool,
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
