use crate::demo::{run_demo, DemoArgs};
use crate::quote::{run_comps, run_quote, CompsArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use zipin::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "zipin-api",
    about = "Compare a guaranteed cash offer with a partnership (novation) offer",
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
    /// Value one property and print the recommendation
    Quote(QuoteArgs),
    /// Summarize a comparable sales CSV against a subject property
    Comps(CompsArgs),
    /// Walk through presets, bands, comps, deal memory, and a letter
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Comps(args) => run_comps(args),
        Command::Demo(args) => run_demo(args),
    }
}
