//! Command-line flags. Every flag can also be set from the environment (or `.env`).

use crate::application::pagination::DEFAULT_PAGE_SIZE;
use crate::infrastructure::up::UP_API_ADDRESS;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Prometheus exporter for the Up Bank API", long_about = None)]
pub struct Cli {
    /// Port to serve the /metrics (and /webhook) HTTP handlers on
    #[arg(long, env = "UP_EXPORTER_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind the HTTP listener to
    #[arg(long, env = "UP_EXPORTER_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Path to the Up API bearer token. See https://developer.up.com.au/#authentication
    #[arg(
        long = "up-bank-bearer-token-path",
        env = "UP_BANK_BEARER_TOKEN_PATH",
        default_value = "/up/token.key"
    )]
    pub bearer_token_path: PathBuf,

    /// Path to an Up webhook secret key for authenticating received webhook requests.
    /// The /webhook endpoint is only served when this is set.
    #[arg(long = "up-bank-webhook-secret-key-path", env = "UP_BANK_WEBHOOK_SECRET_KEY_PATH")]
    pub webhook_secret_key_path: Option<PathBuf>,

    /// Base URL of the Up API
    #[arg(long, env = "UP_API_BASE_URL", default_value = UP_API_ADDRESS)]
    pub up_api_base_url: String,

    /// Page size for paginated Up API requests
    #[arg(
        long,
        env = "UP_API_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub page_size: u32,

    /// Deadline in seconds for processing one webhook delivery
    #[arg(
        long,
        env = "UP_WEBHOOK_TIMEOUT_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub webhook_timeout_secs: u64,
}
