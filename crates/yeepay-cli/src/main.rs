//! Yeepay CLI: command-line front end for the Yeepay mobile payment SDK.
//!
//! Subcommands: init, keygen, pay, verify.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Yeepay: signed, encrypted mobile web-pay requests.
#[derive(Parser, Debug)]
#[command(name = "yeepay", version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a template yeepay.toml.
    Init(commands::init::InitArgs),
    /// Generate a merchant RSA key pair.
    Keygen(commands::keygen::KeygenArgs),
    /// Build a mobile web-pay URL.
    Pay(commands::pay::PayArgs),
    /// Verify a payment-result callback.
    Verify(commands::verify::VerifyArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.with_target(true).init();
    }

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Keygen(args) => commands::keygen::run(args),
        Commands::Pay(args) => commands::pay::run(args),
        Commands::Verify(args) => commands::verify::run(args),
    }
}
