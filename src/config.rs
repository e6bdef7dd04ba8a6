use std::{fmt::Display, str::FromStr};

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

/// Origin that is always allowed alongside `FRONTEND_URL`.
pub const LOCAL_FRONTEND_ORIGIN: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection string; wins over the individual fields when set.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL").ok();
        // Individual credentials are only mandatory without DATABASE_URL.
        let required = |key: &str| -> anyhow::Result<String> {
            match std::env::var(key) {
                Ok(v) => Ok(v),
                Err(_) if url.is_some() => Ok(String::new()),
                Err(e) => Err(e).with_context(|| format!("{key} must be set")),
            }
        };

        Ok(Self {
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
            port: parse_or("DB_PORT", 5432)?,
            name: required("DB_NAME")?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            url,
        })
    }

    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url.parse().context("parse DATABASE_URL");
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub frontend_url: String,
    pub app_host: String,
    pub app_port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            app_host: std::env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            app_port: parse_or("APP_PORT", 8000)?,
        })
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.clone()];
        if self.frontend_url != LOCAL_FRONTEND_ORIGIN {
            origins.push(LOCAL_FRONTEND_ORIGIN.to_string());
        }
        origins
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}
