use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "intlog",
    version,
    about = "Inspect and report integration sync transactions"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    #[command(flatten)]
    service: commands::ServiceArgs,

    #[command(subcommand)]
    command: commands::Commands,
}

/// Crates whose logs `-v` turns up; everything else (reqwest, hyper) stays
/// at `warn`.
const OWN_CRATES: [&str; 3] = ["intlog", "intlog_core", "intlog_sdk"];

/// Filter directive for a `-v` count, or `None` to defer to `RUST_LOG`.
fn verbosity_directive(verbose: u8) -> Option<String> {
    let level = match verbose {
        0 => return None,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let mut directives: Vec<String> = OWN_CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect();
    directives.push("warn".to_string());
    Some(directives.join(","))
}

fn init_tracing(verbose: u8) {
    let filter = match verbosity_directive(verbose) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client = cli.service.client()?;

    match &cli.command {
        commands::Commands::Show(args) => commands::show::run(&client, args, cli.format),
        commands::Commands::Search(args) => commands::search::run(&client, args, cli.format),
        commands::Commands::Record(args) => commands::record::run(&client, args, cli.format),
    }
}
