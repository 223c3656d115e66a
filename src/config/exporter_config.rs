use crate::config::cli::Cli;
use crate::domain::errors::ConfigError;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Validated exporter configuration, with key material already loaded.
#[derive(Clone)]
pub struct ExporterConfig {
    pub bind_address: String,
    pub port: u16,
    pub bearer_token: String,
    /// `None` disables the webhook endpoint.
    pub webhook_secret_key: Option<Vec<u8>>,
    pub up_api_base_url: String,
    pub page_size: u32,
    pub webhook_timeout: Duration,
}

impl ExporterConfig {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.bearer_token_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingBearerTokenPath);
        }
        let token = read_key_file("bearer token", &cli.bearer_token_path)?;
        let bearer_token = String::from_utf8_lossy(&token).to_string();
        if bearer_token.is_empty() {
            return Err(ConfigError::EmptyBearerToken);
        }

        let webhook_secret_key = match &cli.webhook_secret_key_path {
            Some(path) if !path.as_os_str().is_empty() => {
                let secret = read_key_file("webhook secret key", path)?;
                if secret.is_empty() {
                    return Err(ConfigError::EmptyWebhookSecret);
                }
                Some(secret)
            }
            _ => None,
        };

        Ok(Self {
            bind_address: cli.bind_address.clone(),
            port: cli.port,
            bearer_token,
            webhook_secret_key,
            up_api_base_url: cli.up_api_base_url.clone(),
            page_size: cli.page_size,
            webhook_timeout: Duration::from_secs(cli.webhook_timeout_secs),
        })
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn webhook_enabled(&self) -> bool {
        self.webhook_secret_key.is_some()
    }
}

impl fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterConfig")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("bearer_token", &"<redacted>")
            .field("webhook_enabled", &self.webhook_enabled())
            .field("up_api_base_url", &self.up_api_base_url)
            .field("page_size", &self.page_size)
            .field("webhook_timeout", &self.webhook_timeout)
            .finish()
    }
}

/// Read a key file, dropping surrounding whitespace such as a trailing newline.
fn read_key_file(what: &'static str, path: &Path) -> Result<Vec<u8>, ConfigError> {
    let contents = std::fs::read(path).map_err(|source| ConfigError::ReadKeyFile {
        what,
        path: path.display().to_string(),
        source,
    })?;
    Ok(contents.trim_ascii().to_vec())
}
