use std::env;
use std::time::Duration;
use anyhow::{Context, Result, bail};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub spanner_emulator_host: Option<String>,
    pub store_timeout: Duration,
    pub store_connect_timeout: Duration,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let database_name = env::var("DATABASE_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty());

        let spanner_emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        let store_timeout_secs = env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .context("STORE_TIMEOUT_SECS must be a whole number of seconds")?;
        if store_timeout_secs == 0 {
            bail!("STORE_TIMEOUT_SECS must be greater than zero");
        }

        // Connecting may provision tables, so it gets its own, longer bound.
        let store_connect_timeout_secs = env::var("STORE_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("STORE_CONNECT_TIMEOUT_SECS must be a whole number of seconds")?;
        if store_connect_timeout_secs == 0 {
            bail!("STORE_CONNECT_TIMEOUT_SECS must be greater than zero");
        }

        let service_port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            database_url,
            database_name,
            spanner_emulator_host,
            store_timeout: Duration::from_secs(store_timeout_secs),
            store_connect_timeout: Duration::from_secs(store_connect_timeout_secs),
            service_port,
            service_host,
        })
    }

    /// Whether a connection string was supplied. The value itself is never exposed.
    pub fn database_url_set(&self) -> bool {
        self.database_url.is_some()
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Database URL: {}",
            if self.database_url_set() { "set" } else { "not set (running without a store)" });
        if let Some(name) = &self.database_name {
            tracing::info!("  Database name override: {}", name);
        }
        tracing::info!("  Spanner emulator: {}",
            self.spanner_emulator_host.as_deref().unwrap_or("disabled"));
        tracing::info!("  Store timeout: {}s (connect: {}s)",
            self.store_timeout.as_secs(), self.store_connect_timeout.as_secs());
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

#[cfg(test)]
impl Config {
    /// Config used by handler tests; nothing here is read from the environment.
    pub fn for_tests(database_url: Option<&str>) -> Self {
        Config {
            database_url: database_url.map(str::to_string),
            database_name: None,
            spanner_emulator_host: None,
            store_timeout: Duration::from_secs(5),
            store_connect_timeout: Duration::from_secs(5),
            service_port: 8000,
            service_host: "0.0.0.0".to_string(),
        }
    }
}
