//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Hierarchical topic maps: build, persist and explore learning roadmaps
#[derive(Parser, Debug)]
#[command(name = "roadmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding persisted roadmaps (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty roadmap
    New {
        /// Roadmap name, also the root topic's name
        name: String,
        /// Roadmap id (default: random)
        #[arg(long)]
        id: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Add a topic below a parent topic
    Add {
        /// Roadmap id
        map: String,
        /// Parent topic id
        parent: String,
        /// New topic id
        id: String,
        /// New topic name
        name: String,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Remove a topic and everything below it
    Rm {
        /// Roadmap id
        map: String,
        /// Topic id
        id: String,
    },

    /// Change a topic's name or description
    Edit {
        /// Roadmap id
        map: String,
        /// Topic id
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Show a roadmap as tree
    Show {
        /// Roadmap id
        map: String,
        /// Show only the subtree below this topic
        #[arg(long)]
        topic: Option<String>,
    },

    /// Show topics grouped by level
    Layers {
        /// Roadmap id
        map: String,
    },

    /// Print all topic names
    Keys {
        /// Roadmap id
        map: String,
    },

    /// Write a roadmap as JSON
    Export {
        /// Roadmap id
        map: String,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Read a roadmap from JSON
    Import {
        /// JSON file in export format
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Roadmap name (default: root topic name)
        #[arg(long)]
        name: Option<String>,
    },

    /// List persisted roadmaps
    List,

    /// Delete a persisted roadmap
    Delete {
        /// Roadmap id
        map: String,
    },

    /// Fetch news related to a roadmap's topics
    Feeds {
        /// Roadmap id
        map: String,
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
    /// Show effective configuration
    Show,
    /// Print a config file template
    Template,
    /// Show config file location
    Path,
}
