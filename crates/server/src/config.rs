/// Server configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,

    /// Path of the encrypted store file
    pub db_path: String,

    /// Passphrase for the store file at rest
    pub db_key: String,

    /// Finnhub API key; absent means US quote calls fail with a config error
    pub finnhub_api_key: Option<String>,

    /// Shared secret the external scheduler presents on rollup triggers;
    /// absent means every trigger is rejected
    pub cron_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let db_key = std::env::var("PORTFEL_DB_KEY")
            .map_err(|_| anyhow::anyhow!("PORTFEL_DB_KEY must be set (store file passphrase)"))?;

        Ok(Self {
            listen_addr: env_or("PORTFEL_LISTEN_ADDR", "0.0.0.0:3001"),
            db_path: env_or("PORTFEL_DB_PATH", "portfel.db"),
            db_key,
            finnhub_api_key: std::env::var("FINNHUB_API_KEY").ok(),
            cron_secret: std::env::var("CRON_JOB_SECRET").ok(),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
