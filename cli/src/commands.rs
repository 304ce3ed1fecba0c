//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for consilium
#[derive(Parser, Debug)]
#[command(name = "consilium")]
#[command(author, version, about = "Council deliberations - multiple models deliberate, you watch it stream")]
#[command(long_about = r#"
Consilium submits a prompt to a council backend, which orchestrates several
language models according to a strategy and streams progress back:

  pipeline   plan -> parallel research -> critique -> synthesis
  ensemble   all members answer in parallel, the chairman synthesizes
  panel      diagnostic panel: propose -> critique/test -> refine -> verdict

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. CONSILIUM_* environment variables
3. ./consilium.toml    Project-level config
4. ~/.config/consilium/config.toml   Global config

Example:
  consilium run "What's the best way to handle errors in Rust?"
  consilium run -m openai/gpt-4o -m google/gemini-2.5-pro -s ensemble "Compare async patterns"
  consilium chat "hello" && consilium chat --conversation 7 "tell me more"
  consilium history 7
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress live progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one council deliberation over a prompt
    Run {
        /// The prompt to deliberate on
        prompt: String,

        /// Council member models (can be specified multiple times)
        #[arg(short, long, value_name = "MODEL")]
        model: Vec<String>,

        /// Chairman model for the final synthesis
        #[arg(long, value_name = "MODEL")]
        chairman: Option<String>,

        /// Orchestration strategy (pipeline, ensemble, panel)
        #[arg(short, long, value_name = "STRATEGY")]
        strategy: Option<String>,

        /// Maximum diagnostic-panel iterations
        #[arg(long, value_name = "N")]
        max_iterations: Option<u32>,
    },

    /// Start or continue a multi-turn chat session
    Chat {
        /// This turn's prompt
        prompt: String,

        /// Conversation id to continue (omit to start a new session)
        #[arg(long, value_name = "ID")]
        conversation: Option<i64>,

        /// Council member models (can be specified multiple times)
        #[arg(short, long, value_name = "MODEL")]
        model: Vec<String>,

        /// Chairman model for the final synthesis
        #[arg(long, value_name = "MODEL")]
        chairman: Option<String>,

        /// Uploaded attachment ids to anchor on this turn
        #[arg(long = "attach", value_name = "ID")]
        attachments: Vec<String>,
    },

    /// Browse persisted deliberations
    History {
        /// Conversation id to replay; lists all conversations when omitted
        id: Option<i64>,
    },

    /// List models offered by the backend
    Models,
}
