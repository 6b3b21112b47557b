use config as config_rs;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Prefix for environment overrides, e.g. `SOURCE_PROFILER_BIND_ADDRESS`.
pub const ENV_PREFIX: &str = "SOURCE_PROFILER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub log_format: LogFormat,
    pub max_payload_bytes: usize,
}

impl ServerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            fetch_timeout_secs: 30,
            user_agent: concat!("source-profiler/", env!("CARGO_PKG_VERSION")).to_string(),
            log_format: LogFormat::Json,
            max_payload_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    MissingFile(String),
    #[error("config error: {0}")]
    Config(#[from] config_rs::ConfigError),
}

/// Defaults, then the optional file, then `SOURCE_PROFILER_*` variables,
/// then the bind address from the command line.
pub fn load_config(path: Option<&Path>, bind_override: Option<&str>) -> Result<ServerConfig, ConfigError> {
    let defaults = ServerConfig::default();
    let mut builder = config_rs::Config::builder()
        .set_default("bind_address", defaults.bind_address)?
        .set_default("fetch_timeout_secs", defaults.fetch_timeout_secs)?
        .set_default("user_agent", defaults.user_agent)?
        .set_default("log_format", "json")?
        .set_default("max_payload_bytes", defaults.max_payload_bytes as u64)?;

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.display().to_string()));
        }
        builder = builder.add_source(config_rs::File::from(path));
    }

    builder = builder.add_source(config_rs::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    if let Some(bind) = bind_override {
        builder = builder.set_override("bind_address", bind)?;
    }

    Ok(builder.build()?.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // Environment variables are process-wide; config tests take turns.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_defaults() {
        let _env = env_guard();
        let cfg = load_config(None, None).unwrap();
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.max_payload_bytes, 64 * 1024);
        assert!(cfg.user_agent.starts_with("source-profiler/"));
    }

    #[test]
    fn test_file_and_cli_override() {
        let _env = env_guard();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "bind_address = \"127.0.0.1:9000\"").unwrap();
        writeln!(file, "fetch_timeout_secs = 5").unwrap();
        writeln!(file, "log_format = \"pretty\"").unwrap();

        let cfg = load_config(Some(file.path()), None).unwrap();
        assert_eq!(cfg.bind_address, "127.0.0.1:9000");
        assert_eq!(cfg.fetch_timeout_secs, 5);
        assert_eq!(cfg.log_format, LogFormat::Pretty);

        let cfg = load_config(Some(file.path()), Some("127.0.0.1:9100")).unwrap();
        assert_eq!(cfg.bind_address, "127.0.0.1:9100");
    }

    #[test]
    fn test_missing_file() {
        let _env = env_guard();
        let err = load_config(Some(Path::new("/definitely/not/here.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_env_override() {
        let _env = env_guard();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "fetch_timeout_secs = 5").unwrap();

        std::env::set_var("SOURCE_PROFILER_FETCH_TIMEOUT_SECS", "7");
        std::env::set_var("SOURCE_PROFILER_BIND_ADDRESS", "127.0.0.1:9200");
        let from_env = load_config(Some(file.path()), None);
        let from_cli = load_config(Some(file.path()), Some("127.0.0.1:9300"));
        std::env::remove_var("SOURCE_PROFILER_FETCH_TIMEOUT_SECS");
        std::env::remove_var("SOURCE_PROFILER_BIND_ADDRESS");

        let cfg = from_env.unwrap();
        assert_eq!(cfg.fetch_timeout_secs, 7);
        assert_eq!(cfg.bind_address, "127.0.0.1:9200");

        let cfg = from_cli.unwrap();
        assert_eq!(cfg.fetch_timeout_secs, 7);
        assert_eq!(cfg.bind_address, "127.0.0.1:9300");
    }
}
