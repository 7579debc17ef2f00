pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "shopkeep",
    about = "Shopkeep operator CLI",
    long_about = "Operate the shopkeep item store (migrations, demo data, config inspection, readiness) and preview the catalog page.",
    after_help = "Examples:\n  shopkeep doctor --json\n  shopkeep seed\n  shopkeep catalog --search phone --add 2:3"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the demo inventory (idempotent) and verify it is present")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, database connectivity, and schema readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Drive the catalog page through a sequence of actions and print the result")]
    Catalog(commands::catalog::CatalogArgs),
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Catalog(args) => commands::catalog::run(&args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
