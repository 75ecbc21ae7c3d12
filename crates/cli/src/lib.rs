pub mod commands;
mod notifier;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use trolley_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "trolley",
    about = "Trolley shopping cart CLI",
    long_about = "Drive the shopping cart: add and remove products, change quantities, \
                  inspect the persisted cart, and manage the local database.",
    after_help = "Examples:\n  trolley add 1\n  trolley set 1 3\n  trolley show"
)]
pub struct Cli {
    /// Path to a trolley.toml config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Add one unit of a product to the cart")]
    Add { product_id: i64 },
    #[command(about = "Remove a product's line from the cart")]
    Remove { product_id: i64 },
    #[command(about = "Set a product's quantity outright")]
    Set { product_id: i64, amount: u32 },
    #[command(about = "Print the current cart without mutating it")]
    Show,
    #[command(about = "Apply pending database migrations")]
    Migrate,
    #[command(about = "Print the effective configuration as JSON")]
    Config,
}

fn init_logging(config: &AppConfig) {
    use trolley_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // A second init (tests, repeated calls) is harmless; ignore it.
    let result = match config.logging.format {
        Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .compact()
            .try_init(),
        Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .pretty()
            .try_init(),
        Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .json()
            .try_init(),
    };
    let _ = result;
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let options = LoadOptions { config_path: cli.config, ..LoadOptions::default() };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            let result = commands::CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Add { product_id } => commands::add::run(&config, product_id),
        Command::Remove { product_id } => commands::remove::run(&config, product_id),
        Command::Set { product_id, amount } => commands::set::run(&config, product_id, amount),
        Command::Show => commands::show::run(&config),
        Command::Migrate => commands::migrate::run(&config),
        Command::Config => commands::config::run(&config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
