use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "surveyor",
    about = "Surveyor: conditional logic and publish checks for multi-page surveys",
    version
)]
pub struct Cli {
    /// Path to a surveyor.toml configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log filter directive (overrides SURVEYOR_LOG and the config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a survey snapshot is ready to publish
    Validate {
        /// Path to the survey snapshot JSONL
        snapshot: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List questions participating in conditional-rule cycles
    Cycles {
        /// Path to the survey snapshot JSONL
        snapshot: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve visibility and requiredness for the current answers
    Evaluate {
        /// Path to the survey snapshot JSONL
        snapshot: String,

        /// Path to a JSON object of answers keyed by question id
        #[arg(long)]
        answers: String,

        /// Single question or page to evaluate (whole survey when omitted)
        #[arg(long)]
        target: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List visible required questions still missing an answer
    Complete {
        /// Path to the survey snapshot JSONL
        snapshot: String,

        /// Path to a JSON object of answers keyed by question id
        #[arg(long)]
        answers: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decide whether the survey may move to another status
    Transition {
        /// Path to the survey snapshot JSONL
        snapshot: String,

        /// Requested status: draft, open, or closed
        #[arg(long)]
        to: String,

        /// Current status (defaults to the status recorded on the survey)
        #[arg(long)]
        from: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
