use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Public origin used in canonical URLs, the sitemap, and robots.txt
    pub public_base_url: String,
    /// Shared secret the hosted identity provider signs access tokens with
    pub auth_jwt_secret: String,
    pub auth_jwt_issuer: String,
    /// Where the login page sends users to start the OAuth flow
    pub auth_login_url: String,
    pub storage_base_url: String,
    pub storage_bucket: String,
    pub storage_service_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            auth_jwt_secret: env::var("AUTH_JWT_SECRET")
                .context("AUTH_JWT_SECRET must be set")?,
            auth_jwt_issuer: env::var("AUTH_JWT_ISSUER")
                .unwrap_or_else(|_| "directory-auth".to_string()),
            auth_login_url: env::var("AUTH_LOGIN_URL")
                .context("AUTH_LOGIN_URL must be set")?,
            storage_base_url: env::var("STORAGE_BASE_URL")
                .context("STORAGE_BASE_URL must be set")?,
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "images".to_string()),
            storage_service_key: env::var("STORAGE_SERVICE_KEY")
                .context("STORAGE_SERVICE_KEY must be set")?,
        })
    }
}
