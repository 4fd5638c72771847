//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use openai_invoker::OpenAiConfig;

/// Default bind address.
pub const DEFAULT_API_ADDR: &str = "0.0.0.0:5000";

/// Default SQLite URL.
pub const DEFAULT_SQLITE_PATH: &str = "sqlite:agentic_ai.db?mode=rwc";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Model endpoint settings.
    pub openai: OpenAiConfig,
    /// Optional override for the agent behaviour rules.
    pub agent_prompt_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `0.0.0.0:5000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:agentic_ai.db?mode=rwc` |
    /// | `OPENAI_API_KEY` | Model credential | (none; model calls fail without it) |
    /// | `OPENAI_API_URL` | Chat-completions base URL | `https://api.openai.com` |
    /// | `LLM_MODEL` | Model name | `gpt-4o-mini` |
    /// | `AGENT_PROMPT_FILE` | Agent rules override | (unset) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr_raw = non_empty_var("API_ADDR").unwrap_or_else(|| DEFAULT_API_ADDR.to_string());
        let addr = addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(addr_raw))?;

        let database_url =
            non_empty_var("SQLITE_PATH").unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());

        let agent_prompt_file = non_empty_var("AGENT_PROMPT_FILE").map(PathBuf::from);

        Ok(Self {
            addr,
            database_url,
            openai: OpenAiConfig::from_env(),
            agent_prompt_file,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format: {0}")]
    InvalidAddr(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const KEYS: [&str; 4] = ["API_ADDR", "SQLITE_PATH", "AGENT_PROMPT_FILE", "LLM_MODEL"];

    fn clear() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();

        clear();
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr, DEFAULT_API_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_url, DEFAULT_SQLITE_PATH);
        assert!(config.agent_prompt_file.is_none());

        env::set_var("API_ADDR", "127.0.0.1:9000");
        env::set_var("SQLITE_PATH", "sqlite::memory:");
        env::set_var("AGENT_PROMPT_FILE", "rules.md");
        env::set_var("LLM_MODEL", "gpt-4o");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.agent_prompt_file, Some(PathBuf::from("rules.md")));
        assert_eq!(config.openai.model, "gpt-4o");

        env::set_var("API_ADDR", "not-an-addr");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr(a)) if a == "not-an-addr"));

        clear();
    }
}
