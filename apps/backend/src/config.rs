use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_HOST: &str = "localhost:5432";
const DEFAULT_DB_NAME: &str = "task_management";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Backend configuration (from the process environment, after `.env` loading)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub name: String,
    pub max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables.
    /// `DB_USER` and `DB_PASS` are required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user = lookup("DB_USER")
            .filter(|v| !v.is_empty())
            .context("DB_USER must be set in environment")?;
        let password = lookup("DB_PASS")
            .filter(|v| !v.is_empty())
            .context("DB_PASS must be set in environment")?;

        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT '{}' is not a valid port", port))?,
            None => DEFAULT_PORT,
        };

        let max_connections = match lookup("PG_MAX_CONNECTIONS") {
            Some(n) => n
                .parse()
                .with_context(|| format!("PG_MAX_CONNECTIONS '{}' is not a number", n))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database: DatabaseConfig {
                user,
                password,
                host: lookup("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
                name: lookup("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
                max_connections,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}/{}",
            self.user, self.password, self.host, self.name
        )
    }
}
