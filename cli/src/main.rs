//! dosh - Interactive shell for DigitalOcean droplets

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use droplet_shell::cli::Cli;
use droplet_shell::output::json::{error_code, format_error};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DOSH_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            match format_error(&message, error_code(&e)) {
                Ok(obj) if json => println!("{obj}"),
                _ => eprintln!("Error: {message}"),
            }
            ExitCode::FAILURE
        }
    }
}
