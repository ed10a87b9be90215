//! Configuration management for Chatbox.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Config files (.chatbox/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is workspace-centric, with local state stored in `.chatbox/`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Providers the answering mechanism can be built from.
pub const KNOWN_PROVIDERS: [&str; 3] = ["ollama", "gemini", "offline"];

/// Default request timeout for the answering mechanism, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .chatbox/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Answering provider (e.g., "ollama", "gemini", "offline")
    pub provider: String,

    /// Default model identifier
    pub model: String,

    /// API key for the provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider configurations from config.yaml
    pub llm: Option<LlmConfig>,

    /// SQLite article store, relative paths resolve against the workspace
    pub store_path: PathBuf,

    /// Retrieval engine tuning
    pub engine: EngineConfig,

    /// HTTP server binding
    pub server: ServerConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
///
/// Variant order matters for untagged matching: Gemini entries are the only
/// ones carrying `apiKeyEnv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    Gemini {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
        timeout: Option<u64>,
        temperature: Option<f32>,
        #[serde(rename = "maxTokens")]
        max_tokens: Option<u32>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
        temperature: Option<f32>,
        #[serde(rename = "maxTokens")]
        max_tokens: Option<u32>,
    },
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            Self::Gemini { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    /// Custom endpoint, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Gemini { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint),
        }
    }

    /// Request timeout in seconds, if configured.
    pub fn timeout(&self) -> Option<u64> {
        match self {
            Self::Gemini { timeout, .. } | Self::Ollama { timeout, .. } => *timeout,
        }
    }

    /// Sampling temperature, if configured.
    pub fn temperature(&self) -> Option<f32> {
        match self {
            Self::Gemini { temperature, .. } | Self::Ollama { temperature, .. } => *temperature,
        }
    }

    /// Reply length limit in tokens, if configured.
    pub fn max_tokens(&self) -> Option<u32> {
        match self {
            Self::Gemini { max_tokens, .. } | Self::Ollama { max_tokens, .. } => *max_tokens,
        }
    }
}

/// Tuning for segmentation and context selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fragment size in characters
    #[serde(rename = "chunkSize", default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Maximum fragments selected per question
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: usize,

    /// Recent turns used for relevance expansion and prompt assembly
    #[serde(rename = "historyWindow", default = "default_history_window")]
    pub history_window: usize,
}

fn default_chunk_size() -> usize {
    100
}

fn default_top_k() -> usize {
    3
}

fn default_history_window() -> usize {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            top_k: default_top_k(),
            history_window: default_history_window(),
        }
    }
}

/// HTTP server binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    store: Option<StoreConfig>,
    engine: Option<EngineConfig>,
    server: Option<ServerConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            store_path: PathBuf::from(".chatbox/articles.db"),
            engine: EngineConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// Environment variables:
    /// - `CHATBOX_WORKSPACE`: Override workspace path
    /// - `CHATBOX_CONFIG`: Path to config file
    /// - `CHATBOX_PROVIDER`: Answering provider
    /// - `CHATBOX_MODEL`: Model identifier
    /// - `CHATBOX_API_KEY`: API key
    /// - `CHATBOX_STORE`: Article store path
    /// - `PORT`: HTTP server port
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use chatbox_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], with explicit workspace and config file
    /// paths taking precedence over their environment variables.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let workspace =
            workspace.or_else(|| std::env::var_os("CHATBOX_WORKSPACE").map(PathBuf::from));
        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var_os("CHATBOX_CONFIG").map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.workspace.join(".chatbox/config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        config.apply_env()?;

        Ok(config)
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(provider) = std::env::var("CHATBOX_PROVIDER") {
            self.provider = provider;
        }

        if let Ok(model) = std::env::var("CHATBOX_MODEL") {
            self.model = model;
        }

        if let Ok(key) = std::env::var("CHATBOX_API_KEY") {
            self.api_key = Some(key);
        }

        if let Ok(store) = std::env::var("CHATBOX_STORE") {
            self.store_path = PathBuf::from(store);
        }

        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid PORT '{}': {}", port, e)))?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(path) = config_file.store.and_then(|store| store.path) {
            result.store_path = PathBuf::from(path);
        }

        if let Some(engine) = config_file.engine {
            result.engine = engine;
        }

        if let Some(server) = config_file.server {
            result.server = server;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            if provider != self.provider {
                // A different provider's configured model no longer applies
                self.model = self
                    .get_provider_config(&provider)
                    .map(|pc| pc.model().to_string())
                    .unwrap_or_else(|| self.model.clone());
            }
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .chatbox directory.
    pub fn chatbox_dir(&self) -> PathBuf {
        self.workspace.join(".chatbox")
    }

    /// Ensure the .chatbox directory exists.
    pub fn ensure_chatbox_dir(&self) -> AppResult<()> {
        let dir = self.chatbox_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .chatbox directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Resolved location of the SQLite article store.
    pub fn store_path(&self) -> PathBuf {
        if self.store_path.is_absolute() {
            self.store_path.clone()
        } else {
            self.workspace.join(&self.store_path)
        }
    }

    /// Get a provider's configuration, if the config file declares one.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Custom endpoint for the active provider.
    pub fn resolve_endpoint(&self) -> Option<String> {
        self.get_provider_config(&self.provider)
            .and_then(|pc| pc.endpoint().map(str::to_string))
    }

    /// Timeout applied to each call to the answering mechanism.
    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .get_provider_config(&self.provider)
            .and_then(|pc| pc.timeout())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Sampling temperature for the active provider.
    pub fn temperature(&self) -> Option<f32> {
        self.get_provider_config(&self.provider)
            .and_then(|pc| pc.temperature())
    }

    /// Reply length limit for the active provider.
    pub fn max_tokens(&self) -> Option<u32> {
        self.get_provider_config(&self.provider)
            .and_then(|pc| pc.max_tokens())
    }

    /// Resolve the API key for a provider.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        // Explicit CHATBOX_API_KEY wins
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.get_provider_config(provider) {
            Some(ProviderConfig::Gemini { api_key_env, .. }) => std::env::var(&api_key_env).ok(),
            _ => None,
        }
    }

    /// Validate configuration for the active provider and engine.
    pub fn validate(&self) -> AppResult<()> {
        let provider = &self.provider;

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "gemini" && self.resolve_api_key(provider).is_none() {
            let env_var = match self.get_provider_config(provider) {
                Some(ProviderConfig::Gemini { api_key_env, .. }) => api_key_env,
                _ => "CHATBOX_API_KEY".to_string(),
            };
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                env_var
            )));
        }

        if self.engine.chunk_size == 0 {
            return Err(AppError::Config("engine.chunkSize must be greater than 0".to_string()));
        }

        if self.engine.top_k == 0 {
            return Err(AppError::Config("engine.topK must be greater than 0".to_string()));
        }

        if self.engine.history_window == 0 {
            return Err(AppError::Config(
                "engine.historyWindow must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.engine.chunk_size, 100);
        assert_eq!(config.server.port, 8080);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_chatbox_dir_and_store_path() {
        let mut config = AppConfig::default();
        config.workspace = PathBuf::from("/srv/news");
        assert!(config.chatbox_dir().ends_with(".chatbox"));
        assert_eq!(
            config.store_path(),
            PathBuf::from("/srv/news/.chatbox/articles.db")
        );

        config.store_path = PathBuf::from("/var/lib/articles.db");
        assert_eq!(config.store_path(), PathBuf::from("/var/lib/articles.db"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("offline".to_string()),
            Some("none".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "offline");
        assert_eq!(overridden.model, "none");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  activeProvider: gemini
  providers:
    gemini:
      apiKeyEnv: CHATBOX_TEST_GEMINI_KEY
      model: gemini-1.5-flash
      timeout: 5
    ollama:
      endpoint: http://localhost:11434
      model: llama3.2
      temperature: 0.2
      maxTokens: 200
store:
  path: data/articles.db
engine:
  chunkSize: 50
logging:
  level: warn
  color: false
"#,
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(merged.provider, "gemini");
        assert_eq!(merged.model, "gemini-1.5-flash");
        assert_eq!(merged.store_path, PathBuf::from("data/articles.db"));
        assert_eq!(merged.engine.chunk_size, 50);
        assert_eq!(merged.engine.top_k, 3);
        assert_eq!(merged.log_level, Some("warn".to_string()));
        assert!(merged.no_color);
        assert_eq!(merged.request_timeout(), Duration::from_secs(5));
        assert!(matches!(
            merged.get_provider_config("gemini"),
            Some(ProviderConfig::Gemini { .. })
        ));
        assert!(matches!(
            merged.get_provider_config("ollama"),
            Some(ProviderConfig::Ollama { .. })
        ));

        assert_eq!(merged.temperature(), None);
        assert_eq!(merged.max_tokens(), None);

        let switched = merged.with_overrides(
            None,
            None,
            Some("ollama".to_string()),
            None,
            None,
            false,
            false,
        );
        assert_eq!(switched.model, "llama3.2");
        assert_eq!(switched.temperature(), Some(0.2));
        assert_eq!(switched.max_tokens(), Some(200));
        assert_eq!(
            switched.resolve_endpoint(),
            Some("http://localhost:11434".to_string())
        );
    }

    #[test]
    fn test_load_from_explicit_paths() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yaml");
        std::fs::write(&path, "engine:\n  topK: 5\nserver:\n  port: 9090\n").unwrap();

        let config = AppConfig::load_from(Some(temp.path().to_path_buf()), Some(path)).unwrap();
        assert_eq!(config.workspace, temp.path());
        assert_eq!(config.engine.top_k, 5);
        assert_eq!(config.engine.chunk_size, 100);
        assert_eq!(config.server.host, "0.0.0.0");

        let missing = AppConfig::load_from(Some(temp.path().join("absent")), None);
        assert!(matches!(missing, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama_and_offline() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());
        config.provider = "offline".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_gemini_requires_key() {
        let mut config = AppConfig::default();
        config.provider = "gemini".to_string();
        assert!(config.validate().is_err());

        config.api_key = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_engine_bounds() {
        let mut config = AppConfig::default();
        config.engine.chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.engine.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.engine.history_window = 0;
        assert!(matches!(config.validate(), Err(AppError::Config(msg)) if msg.contains("historyWindow")));

        let mut config = AppConfig::default();
        config.engine.history_window = 1;
        config.provider = "offline".to_string();
        assert!(config.validate().is_ok());
    }
}
