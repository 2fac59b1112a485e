//! Server configuration.
//!
//! Values are layered, later sources overriding earlier ones:
//! 1. Bundled defaults (`gamesmith.toml` shipped with the crate)
//! 2. User config in the home directory (`~/.config/gamesmith/gamesmith.toml`)
//! 3. User config in the current directory (`./gamesmith.toml`)
//! 4. An explicit file, when one is given
//! 5. `GAMESMITH__*` environment variables (`GAMESMITH__SERVER__BIND=0.0.0.0:8000`)
//!
//! The Gemini API key is the exception: it only ever comes from the
//! `GEMINI_API_KEY` environment variable and is never written to config files.

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use gamesmith_core::PromptPolicy;
use gamesmith_error::ConfigError;
use gamesmith_models::{GeminiConfig, GeminiConfigBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../gamesmith.toml");

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Getters)]
pub struct ServerSettings {
    /// Socket address to listen on
    bind: String,
    /// Page served at `/`, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frontend_index: Option<PathBuf>,
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Getters)]
pub struct StorageSettings {
    /// Directory holding generated games
    root: PathBuf,
}

/// `[gemini]` section. Everything but the credential.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Getters)]
pub struct GeminiSettings {
    /// Model name
    model: String,
    /// Scheme and host of the REST API
    base_url: String,
    /// Bound on one generation call, in seconds
    request_timeout_secs: u64,
    /// Sampling temperature
    temperature: f32,
    /// Output token cap
    max_output_tokens: u32,
}

impl GeminiSettings {
    /// Bound on one generation call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Top-level Gamesmith configuration.
///
/// # Example
///
/// ```no_run
/// use gamesmith_server::GamesmithConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GamesmithConfig::load(None)?;
/// println!("listening on {}", config.server().bind());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Getters)]
pub struct GamesmithConfig {
    /// HTTP listener settings
    server: ServerSettings,
    /// Artifact store settings
    storage: StorageSettings,
    /// Backend settings
    gemini: GeminiSettings,
    /// Prompt length bounds
    #[serde(default)]
    prompt: PromptPolicy,
}

impl GamesmithConfig {
    /// Load configuration from every source, in precedence order.
    ///
    /// `explicit` is an additional file that must exist when given.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be parsed or a value has the wrong type.
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        debug!("Loading configuration: env > explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/gamesmith/gamesmith.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("gamesmith").required(false));

        if let Some(path) = explicit {
            debug!(path = %path.display(), "Adding explicit configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("GAMESMITH")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Bundled defaults overlaid with a single file. Ignores the home
    /// directory, the current directory and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));

        Self::finish(builder)
    }

    /// Bundled defaults only.
    ///
    /// # Errors
    ///
    /// Only if the bundled file itself is broken.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::finish(
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)),
        )
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.prompt.min_chars > self.prompt.max_chars {
            return Err(ConfigError::invalid_setting(
                "prompt.min_chars",
                format!(
                    "({}) exceeds prompt.max_chars ({})",
                    self.prompt.min_chars, self.prompt.max_chars
                ),
            ));
        }
        if self.gemini.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_setting(
                "gemini.request_timeout_secs",
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Override the listen address.
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.server.bind = bind.into();
        self
    }

    /// Override the storage root.
    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage.root = root.into();
        self
    }

    /// Client settings for the Gemini backend.
    ///
    /// `api_key` is the value of [`API_KEY_ENV`], if set.
    ///
    /// # Errors
    ///
    /// Fails when the key is missing or blank.
    pub fn gemini_config(&self, api_key: Option<&str>) -> Result<GeminiConfig, ConfigError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::missing_env(API_KEY_ENV))?;

        GeminiConfigBuilder::default()
            .api_key(api_key)
            .model(self.gemini.model.clone())
            .base_url(self.gemini.base_url.clone())
            .timeout(self.gemini.request_timeout())
            .temperature(self.gemini.temperature)
            .max_output_tokens(self.gemini.max_output_tokens)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid Gemini settings: {}", e)))
    }
}
