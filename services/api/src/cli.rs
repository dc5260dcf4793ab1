use crate::commands::{
    run_admin, run_kb_price, run_quote, run_registry_summary, AdminArgs, KbPriceArgs, QuoteArgs,
    RegistrySummaryArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mortgage_desk::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Mortgage Desk",
    about = "Estimate apartment-backed loan capacity across partner lenders",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank partner lenders for a single borrower
    Quote(QuoteArgs),
    /// Look up the indicative market price for an address
    KbPrice(KbPriceArgs),
    /// Work with property registry extracts
    Registry {
        #[command(subcommand)]
        command: RegistryCommand,
    },
    /// Inspect and edit the admin tables
    Admin(AdminArgs),
}

#[derive(Subcommand, Debug)]
enum RegistryCommand {
    /// Summarize an extracted registry text file
    Summarize(RegistrySummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override DESK_DATA_DIR for the admin tables
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::KbPrice(args) => run_kb_price(args),
        Command::Registry {
            command: RegistryCommand::Summarize(args),
        } => run_registry_summary(args),
        Command::Admin(args) => run_admin(args),
    }
}
