//! Configuration for OpenAiInvoker.

use std::env;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for OpenAiInvoker.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL of the chat completions service.
    pub api_url: String,

    /// API key; `None` makes every call fail with a configuration error.
    pub api_key: Option<String>,

    /// Model name to use.
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Create configuration from environment variables.
    ///
    /// - `OPENAI_API_KEY` - API key (optional here, required to invoke)
    /// - `OPENAI_API_URL` - API URL (default: https://api.openai.com)
    /// - `LLM_MODEL` - Model name (default: gpt-4o-mini)
    ///
    /// Blank values are treated as unset.
    pub fn from_env() -> Self {
        let api_key = non_empty_var("OPENAI_API_KEY");
        let api_url = non_empty_var("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let model = non_empty_var("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            api_url,
            api_key,
            model,
        }
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }

    /// Whether a credential is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Builder for OpenAiConfig.
#[derive(Debug, Default)]
pub struct OpenAiConfigBuilder {
    config: OpenAiConfig,
}

impl OpenAiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAiConfig::default();

        assert_eq!(config.api_url, "https://api.openai.com");
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_builder_all_options() {
        let config = OpenAiConfig::builder()
            .api_key("sk-test")
            .api_url("http://localhost:9999")
            .model("gpt-4o")
            .build();

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.api_url, "http://localhost:9999");
        assert_eq!(config.model, "gpt-4o");
    }

    // Env vars are process-global, so every scenario runs under one lock.
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            std::env::remove_var("OPENAI_API_KEY");
            std::env::remove_var("OPENAI_API_URL");
            std::env::remove_var("LLM_MODEL");
        }

        // Missing key is not an error at load time
        clear_vars();
        let config = OpenAiConfig::from_env();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);

        // Blank key counts as missing
        std::env::set_var("OPENAI_API_KEY", "   ");
        assert!(OpenAiConfig::from_env().api_key.is_none());

        // All set
        clear_vars();
        std::env::set_var("OPENAI_API_KEY", "sk-env");
        std::env::set_var("OPENAI_API_URL", "http://proxy.local");
        std::env::set_var("LLM_MODEL", "gpt-4.1-mini");
        let config = OpenAiConfig::from_env();
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.api_url, "http://proxy.local");
        assert_eq!(config.model, "gpt-4.1-mini");

        clear_vars();
    }
}
