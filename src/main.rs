use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{info, warn};
use reqwest::StatusCode;

use wasatext_client::settings::ClientSettings;
use wasatext_client::{ApiClient, ClientConfig, SharedClient};

#[derive(Parser, Debug)]
#[command(name = "wasatext-client", version, about = "Talk to a WASAText API server")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// API base URL, used when none was compiled in
    /// (falls back to WASATEXT_API_URL, then the settings file)
    #[arg(long = "api-url")]
    api_url: Option<String>,

    /// Location to derive the origin from when no API URL is configured
    /// (falls back to WASATEXT_ORIGIN, then the settings file)
    #[arg(long = "origin")]
    origin: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved base URL and timeout
    Config,
    /// Check that the API server is alive
    Liveness,
    /// GET a path relative to the base URL and print the response body
    Get { path: String },
    /// Save the API base URL to the settings file (an empty URL clears it)
    SetApiUrl { url: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    wasatext_client::logging::init(cli.verbose)?;

    let settings_path = match cli.config.clone() {
        Some(p) => p,
        None => ClientSettings::default_path()?,
    };
    let mut settings = ClientSettings::load(&settings_path)?;

    if let Command::SetApiUrl { url } = &cli.command {
        settings.set_api_url(url);
        settings.save(&settings_path)?;
        info!("Saved settings to {}", settings_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let runtime_url = settings.runtime_api_url(cli.api_url.as_deref());
    let origin = settings.origin_source(cli.origin.as_deref());
    let shared = SharedClient::new(move || {
        let config = ClientConfig::from_build(runtime_url.as_deref(), &origin)?;
        ApiClient::new(config)
    });

    let client = shared.get().context("Failed to configure API client")?;
    run(cli.command, &client).await
}

async fn run(command: Command, client: &ApiClient) -> Result<ExitCode> {
    match command {
        Command::Config => {
            let config = client.config();
            println!("base_url = {}", config.base_url());
            println!("source   = {}", config.source());
            println!("timeout  = {} ms", config.timeout().as_millis());
            Ok(ExitCode::SUCCESS)
        }
        Command::Liveness => {
            let status = client.liveness().await?;
            if status.is_success() {
                info!("{} is alive", client.base_url());
            } else {
                warn!("{} answered liveness check with {}", client.base_url(), status);
            }
            println!("{}", status);
            Ok(ExitCode::from(exit_status(status)))
        }
        Command::Get { path } => {
            let response = client.get(&path).send().await?;
            let status = response.status();
            let body = response.text().await?;
            println!("{}", body);
            if !status.is_success() {
                warn!("GET {} returned {}", client.url(&path), status);
            }
            Ok(ExitCode::from(exit_status(status)))
        }
        // handled in main before the client is built
        Command::SetApiUrl { .. } => Ok(ExitCode::SUCCESS),
    }
}

/// Process exit status for a response: 0 on 2xx, 1 otherwise.
fn exit_status(status: StatusCode) -> u8 {
    if status.is_success() {
        0
    } else {
        1
    }
}
