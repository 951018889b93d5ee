use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use procrun::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "procrun")]
#[command(about = "Launch external programs and watch their output in tabs")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.procrun/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the GUI panel
    Gui,

    /// Run one program headlessly and stream its output
    Run {
        /// Start a saved command instead of (or before) PROGRAM
        #[arg(long)]
        saved: Option<String>,

        /// Working directory for the program
        #[arg(long)]
        cwd: Option<String>,

        /// Line written to the program's stdin (repeatable)
        #[arg(long = "input")]
        inputs: Vec<String>,

        /// Program followed by its arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Manage saved commands
    Commands {
        #[command(subcommand)]
        action: cli::commands::CommandsAction,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(Config::global_config_path);

    match cli.command {
        Some(Commands::Init { force }) => {
            cli::init::init_command(&config_path, force)?;
        }
        Some(Commands::Run {
            saved,
            cwd,
            inputs,
            command,
        }) => {
            let config = Config::load_or_init(&config_path)?;
            let code = cli::run::run_command(&config, saved, cwd, inputs, command)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Some(Commands::Commands { action }) => {
            let config = Config::load_or_init(&config_path)?;
            cli::commands::commands_command(&config, action)?;
        }
        Some(Commands::Gui) | None => {
            // Default: run the GUI
            procrun::gui::run_gui(&config_path)?;
        }
    }

    Ok(())
}
