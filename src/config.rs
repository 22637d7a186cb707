use serde::Deserialize;

/// Which document store backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// MongoDB connection string. `None` leaves the store degraded.
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub port: u16,
    pub store_backend: StoreBackend,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_vars(|key| std::env::var(key).ok())?;

        tracing::info!("Configuration loaded successfully");
        match config.database_url {
            Some(ref url) => tracing::debug!(
                "Database URL: {}...",
                url.chars().take(20).collect::<String>()
            ),
            None => tracing::warn!("DATABASE_URL not set, document store will be unavailable"),
        }
        match config.database_name {
            Some(ref name) => tracing::debug!("Database name: {}", name),
            None => tracing::warn!("DATABASE_NAME not set, document store will be unavailable"),
        }
        tracing::debug!("Store backend: {:?}", config.store_backend);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL")
            .map(|url| {
                if !url.starts_with("mongodb://") && !url.starts_with("mongodb+srv://") {
                    anyhow::bail!("DATABASE_URL must start with mongodb:// or mongodb+srv://");
                }
                Ok(url)
            })
            .transpose()?;

        let port = non_empty("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?;

        let store_backend = match non_empty("STORE_BACKEND")
            .map(|s| s.trim().to_lowercase())
            .as_deref()
        {
            None | Some("mongo") | Some("mongodb") => StoreBackend::Mongo,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("STORE_BACKEND must be 'mongo' or 'memory', got '{}'", other),
        };

        Ok(Self {
            database_url,
            database_name: non_empty("DATABASE_NAME"),
            port,
            store_backend,
        })
    }
}
