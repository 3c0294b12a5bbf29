mod initialize;
mod protocol;
mod resources;
mod server;
mod tools;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use google_ads_api::config::{DEFAULT_API_HOST, DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS};
use google_ads_api::{AdsClient, AdsConfig};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tools::ToolRegistry;

#[derive(Parser, Debug)]
#[command(name = "google-ads-mcp", version, about = "Google Ads tools over the Model Context Protocol")]
struct Args {
    #[arg(long, default_value = "stdio")]
    transport: String,

    /// Service account key file
    #[arg(long, env = "GOOGLE_ADS_CREDENTIALS_PATH")]
    credentials_path: Option<PathBuf>,

    #[arg(long, env = "GOOGLE_ADS_DEVELOPER_TOKEN", default_value = "", hide_env_values = true)]
    developer_token: String,

    /// Manager account the requests are made through
    #[arg(long, env = "GOOGLE_ADS_LOGIN_CUSTOMER_ID", default_value = "")]
    login_customer_id: String,

    #[arg(long, env = "GOOGLE_ADS_API_HOST", default_value = DEFAULT_API_HOST)]
    api_host: String,

    #[arg(long, env = "GOOGLE_ADS_API_VERSION", default_value = DEFAULT_API_VERSION)]
    api_version: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> AdsConfig {
        AdsConfig::new(self.credentials_path, self.developer_token, self.login_customer_id)
            .with_api_host(self.api_host)
            .with_api_version(self.api_version)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may set RUST_LOG, so it is read before the filter is built
    let dotenv = dotenvy::dotenv();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    if args.transport != "stdio" {
        anyhow::bail!("only stdio transport is supported");
    }

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let client = AdsClient::new(args.into_config())?;
    let config = client.config();
    if config.credentials_path.is_none() {
        warn!("GOOGLE_ADS_CREDENTIALS_PATH is not set; tool calls will fail until it is configured");
    }
    info!(api_host = %config.api_host, api_version = %config.api_version, "Starting google-ads-mcp");

    let registry = ToolRegistry::new(client);
    server::serve(&registry, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
