use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xchange::core::dashboard::{Comparison, DisplayMode};
use xchange::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Layout of the dashboard: grid or list
    #[arg(short, long, global = true, default_value = "grid")]
    mode: DisplayMode,

    /// Rate direction: base (1 base = x quote) or quote (1 quote = x base)
    #[arg(long, global = true, default_value = "base")]
    compare: Comparison,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xchange::AppCommand {
    fn from(cmd: Commands) -> xchange::AppCommand {
        match cmd {
            Commands::Show { refresh } => xchange::AppCommand::Show { refresh },
            Commands::Base { code } => xchange::AppCommand::Base(code),
            Commands::Toggle { code } => xchange::AppCommand::Toggle(code),
            Commands::Move { code, target } => xchange::AppCommand::Move { code, target },
            Commands::Currencies { query } => xchange::AppCommand::Currencies(query),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display exchange rates for your favorite currencies
    Show {
        /// Fetch new rates even when cached ones exist
        #[arg(short, long)]
        refresh: bool,
    },
    /// Change the base currency
    Base { code: String },
    /// Add or remove a favorite currency
    Toggle { code: String },
    /// Move a favorite to the position of another
    Move { code: String, target: String },
    /// List the known currencies
    Currencies {
        /// Only show currencies whose code or name contains this text
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let view = xchange::ViewOptions {
        mode: cli.mode,
        comparison: cli.compare,
    };
    let result = match cli.command {
        Some(Commands::Setup) => xchange::cli::setup::setup().map(|path| {
            println!("Created default configuration at {}", path.display());
        }),
        Some(cmd) => xchange::run_command(cmd.into(), view, cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
