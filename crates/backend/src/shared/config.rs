use once_cell::sync::OnceCell;
use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Install the loaded configuration as the process-wide instance.
/// Called once from main; repeated calls are ignored.
pub fn set_global(config: Config) {
    let _ = CONFIG.set(config);
}

/// The process-wide configuration, if main has installed it.
pub fn global() -> Option<&'static Config> {
    CONFIG.get()
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub openai: OpenAiConfig,
    pub mailbox: MailboxConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory where uploaded and enriched CSV files live.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: i32,
    /// Per-row cap on one model call; a hung call falls back, not the batch.
    pub request_timeout_secs: u64,
    /// Pause between consecutive model calls (rate-limit friendliness).
    pub request_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailboxConfig {
    pub enabled: bool,
    pub check_interval_secs: u64,
    pub error_backoff_secs: u64,
    pub max_file_size_mb: u64,
    /// Where the monitor forwards saved attachments (the enrich endpoint).
    pub api_url: String,
    /// Directory an external mail fetcher drops CSV attachments into.
    pub spool_dir: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 8000

[storage]
path = "target/data"

[openai]
api_key = ""
model = "gpt-4o-mini"
temperature = 0.1
max_tokens = 4000
request_timeout_secs = 60
request_delay_ms = 500

[mailbox]
enabled = false
check_interval_secs = 300
error_backoff_secs = 60
max_file_size_mb = 50
api_url = "http://127.0.0.1:8000/api/enrich-csv"
spool_dir = "target/data/spool"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// `OPENAI_API_KEY` in the environment overrides the file value either way.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;

    if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
        if !api_key.is_empty() {
            config.openai.api_key = api_key;
        }
    }

    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert!(!config.mailbox.enabled);
    }
}
