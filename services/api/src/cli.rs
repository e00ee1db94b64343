use crate::demo::{run_audience, run_demo, run_quote, AudienceArgs, DemoArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use harbor_mail::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Harbor Mail",
    about = "Run the Harbor Mail direct-mail service and its calculators from the command line",
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
    /// Price a campaign for a quantity and design option
    Quote(QuoteArgs),
    /// Size a waterfront audience from coverage data
    Audience(AudienceArgs),
    /// Walk a campaign from audience selection through fulfillment
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
        Command::Audience(args) => run_audience(args),
        Command::Demo(args) => run_demo(args),
    }
}
