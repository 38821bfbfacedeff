use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub database_url: String,
    pub database_max_connections: u32,
    pub gateway_base_url: String,
    pub gateway_secret_key: Option<String>,
    pub settlement_currency: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8286".to_string(),
            api_token: None,
            database_url: "postgres://127.0.0.1:5432/stagepass".to_string(),
            database_max_connections: 16,
            gateway_base_url: "https://api.paystack.co".to_string(),
            gateway_secret_key: None,
            settlement_currency: "NGN".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("STAGEPASS_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(secret) = &self.gateway_secret_key {
            if secret.trim().is_empty() {
                self.gateway_secret_key = None;
            }
        }
        while self.gateway_base_url.ends_with('/') {
            self.gateway_base_url.pop();
        }
        self.settlement_currency = self.settlement_currency.trim().to_uppercase();
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.database_url.trim().is_empty() {
            return Err(anyhow!("database_url must not be empty"));
        }
        if self.database_max_connections == 0 {
            return Err(anyhow!("database_max_connections must be greater than 0"));
        }
        if !self.gateway_base_url.starts_with("http://")
            && !self.gateway_base_url.starts_with("https://")
        {
            return Err(anyhow!("gateway_base_url must be an http(s) URL"));
        }
        if self.settlement_currency.is_empty() {
            return Err(anyhow!("settlement_currency must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            gateway_base_url: self.gateway_base_url.clone(),
            gateway_secret_key: self.gateway_secret_key.clone(),
            settlement_currency: self.settlement_currency.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            database_url: self.database_url.clone(),
            max_connections: self.database_max_connections,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("STAGEPASS_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("STAGEPASS_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("STAGEPASS_DATABASE_URL") {
            self.database_url = value;
        }
        if let Ok(value) = env::var("STAGEPASS_DATABASE_MAX_CONNECTIONS") {
            self.database_max_connections =
                value.parse().unwrap_or(self.database_max_connections);
        }
        if let Ok(value) = env::var("STAGEPASS_GATEWAY_BASE_URL") {
            self.gateway_base_url = value;
        }
        if let Ok(value) = env::var("STAGEPASS_GATEWAY_SECRET_KEY") {
            self.gateway_secret_key = Some(value);
        }
        if let Ok(value) = env::var("STAGEPASS_SETTLEMENT_CURRENCY") {
            self.settlement_currency = value;
        }
        if let Ok(value) = env::var("STAGEPASS_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("STAGEPASS_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_blank_secrets_and_trailing_slashes() {
        let mut config = AppConfig {
            api_token: Some("  ".to_string()),
            gateway_secret_key: Some("".to_string()),
            gateway_base_url: "https://api.example.com///".to_string(),
            settlement_currency: " ngn ".to_string(),
            ..AppConfig::default()
        };
        config.normalize();
        assert!(config.api_token.is_none());
        assert!(config.gateway_secret_key.is_none());
        assert_eq!(config.gateway_base_url, "https://api.example.com");
        assert_eq!(config.settlement_currency, "NGN");
    }

    #[test]
    fn validate_rejects_bad_bind_addr() {
        let config = AppConfig {
            bind_addr: "not-an-addr".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_gateway_url() {
        let config = AppConfig {
            gateway_base_url: "ftp://gateway".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
