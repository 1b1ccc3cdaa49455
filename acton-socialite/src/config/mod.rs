//! Configuration management for acton-socialite
//!
//! Provider credentials and HTTP settings are loaded from multiple sources
//! with clear precedence:
//!
//! 1. Environment variables (highest priority, `SOCIALITE_` prefix, `__` for nesting)
//! 2. `./config.toml`
//! 3. `~/.config/acton-socialite/{service_name}/config.toml`
//! 4. `/etc/acton-socialite/{service_name}/config.toml`
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! [http]
//! timeout_secs = 10
//! user_agent = "my-app/1.0"
//!
//! [providers.google]
//! client_id = "your-google-client-id"
//! client_secret = "your-google-client-secret"
//! redirect_url = "http://localhost:3000/auth/google/callback"
//! uses_pkce = true
//! scopes = ["email"]
//!
//! [providers.google.parameters]
//! access_type = "offline"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_socialite::config::SocialiteConfig;
//! use acton_socialite::prelude::*;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = SocialiteConfig::load_for_service("my-app")?;
//!
//! let mut builder = SocialiteBuilder::with_settings(&config);
//! if let Some(google) = config.provider("google") {
//!     builder.add_google(|cfg| cfg.extend(google))?;
//! }
//! let socialite = builder.build()?;
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::oauth2::types::ProviderConfig;

/// Settings for the HTTP client shared by all providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds, `0` disables the timeout
    pub timeout_secs: u64,

    /// User agent sent to identity providers
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("acton-socialite/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpSettings {
    /// Request timeout as a [`Duration`], or `None` when `timeout_secs` is 0
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

/// Complete acton-socialite configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialiteConfig {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Provider settings keyed by driver name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl SocialiteConfig {
    /// Load configuration for a specific service
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be read or parsed
    /// - Configuration values fail type conversion
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new()
            // 5. Defaults (lowest priority)
            .merge(Toml::string(&toml::to_string(&Self::default())?));

        // 4. System config
        let system_config = PathBuf::from("/etc/acton-socialite")
            .join(service_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        // 3. User config
        let user_config = Self::recommended_path(service_name);
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        // 2. Local config
        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        // 1. Environment variables (highest priority)
        figment = figment.merge(Self::env());

        let config = figment.extract()?;
        tracing::debug!(service = service_name, "Loaded socialite configuration");
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values fail
    /// type conversion
    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        let config = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path))
            .merge(Self::env())
            .extract()?;

        Ok(config)
    }

    /// Get the recommended XDG config path for a service
    ///
    /// Returns `~/.config/acton-socialite/{service_name}/config.toml`, or
    /// `./config.toml` when no config directory is available.
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| {
                config_dir
                    .join("acton-socialite")
                    .join(service_name)
                    .join("config.toml")
            },
        )
    }

    /// Settings for a provider, by driver name
    #[must_use]
    pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    fn env() -> Env {
        Env::prefixed("SOCIALITE_").split("__").lowercase(true)
    }
}
