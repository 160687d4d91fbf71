//! Service configuration, loaded from the environment.

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct ReportingConfig {
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub common: engine_core::config::Config,
    pub database: DatabaseConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

impl ReportingConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let common = engine_core::config::Config::load()?;

        let log_level = env::var("REPORTING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let otlp_endpoint = env::var("REPORTING_OTLP_ENDPOINT").ok();

        let url = env::var("REPORTING_DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("REPORTING_DATABASE_URL must be set"))?;
        let max_connections = env::var("REPORTING_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;
        let min_connections = env::var("REPORTING_DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()?;
        let run_migrations = env::var("REPORTING_RUN_MIGRATIONS")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            service_name: "reporting-service".to_string(),
            log_level,
            otlp_endpoint,
            common,
            database: DatabaseConfig {
                url,
                max_connections,
                min_connections,
                run_migrations,
            },
        })
    }
}
