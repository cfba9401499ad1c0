//! Surveyor CLI: the `surveyor` command.

mod cli;
mod commands;
mod config;
mod logging;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use config::SurveyorConfig;

fn main() {
    let cli = Cli::parse();

    let config = SurveyorConfig::resolve(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    logging::init(cli.log_level.as_deref(), config.log.filter.as_deref());
    let json_default = config.output.json;

    match cli.command {
        Commands::Validate { snapshot, json } => {
            commands::validate::run(snapshot, json || json_default)
        }

        Commands::Cycles { snapshot, json } => commands::cycles::run(snapshot, json || json_default),

        Commands::Evaluate {
            snapshot,
            answers,
            target,
            json,
        } => commands::evaluate::run(commands::evaluate::Args {
            snapshot,
            answers,
            target,
            json: json || json_default,
        }),

        Commands::Complete {
            snapshot,
            answers,
            json,
        } => commands::complete::run(snapshot, answers, json || json_default),

        Commands::Transition {
            snapshot,
            to,
            from,
            json,
        } => commands::transition::run(snapshot, to, from, json || json_default),
    }
}
