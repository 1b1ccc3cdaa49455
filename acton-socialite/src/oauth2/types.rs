//! Core OAuth2 types and configuration
//!
//! This module defines the provider settings record shared by every driver,
//! the builder used to populate it during registration, and the token and
//! user types returned by providers.

use oauth2::basic::BasicClient;
use oauth2::{EndpointNotSet, EndpointSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Type alias for a configured OAuth2 client with auth and token endpoints set
///
/// The type parameters indicate which endpoints are configured:
/// - `EndpointSet` for `HasAuthUrl`
/// - `EndpointNotSet` for `HasDeviceAuthUrl`
/// - `EndpointNotSet` for `HasIntrospectionUrl`
/// - `EndpointNotSet` for `HasRevocationUrl`
/// - `EndpointSet` for `HasTokenUrl`
pub type ConfiguredClient = BasicClient<
    EndpointSet,    // HasAuthUrl
    EndpointNotSet, // HasDeviceAuthUrl
    EndpointNotSet, // HasIntrospectionUrl
    EndpointNotSet, // HasRevocationUrl
    EndpointSet,    // HasTokenUrl
>;

/// Default separator placed between scopes in authorization requests
pub const DEFAULT_SCOPE_SEPARATOR: &str = " ";

/// Settings for a single OAuth2 provider
///
/// Values are not validated here. A missing client id or a malformed redirect
/// URL is reported by the provider when it is constructed or used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Redirect URL (callback URL)
    pub redirect_url: String,
    /// Skip CSRF state tracking for this provider
    pub stateless: bool,
    /// Send a PKCE challenge with authorization requests
    pub uses_pkce: bool,
    /// Separator used when joining scopes into the `scope` parameter
    pub scope_separator: String,
    /// OAuth2 scopes to request, in order
    pub scopes: Vec<String>,
    /// Extra query parameters sent with authorization requests
    pub parameters: BTreeMap<String, String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: String::new(),
            stateless: false,
            uses_pkce: false,
            scope_separator: DEFAULT_SCOPE_SEPARATOR.to_string(),
            scopes: Vec::new(),
            parameters: BTreeMap::new(),
        }
    }
}

impl ProviderConfig {
    /// Start building a configuration from neutral defaults
    #[must_use]
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::default()
    }

    /// Copy the values of `fresh` into this configuration
    ///
    /// Scalar settings are overwritten. Scopes are unioned: each non-empty
    /// scope of `fresh` is appended in order unless already present
    /// (case-sensitive). Parameters are overwritten key by key.
    pub fn merge_from(&mut self, fresh: &Self) {
        self.client_id.clone_from(&fresh.client_id);
        self.client_secret.clone_from(&fresh.client_secret);
        self.redirect_url.clone_from(&fresh.redirect_url);
        self.stateless = fresh.stateless;
        self.uses_pkce = fresh.uses_pkce;
        self.scope_separator.clone_from(&fresh.scope_separator);

        for scope in &fresh.scopes {
            if !scope.is_empty() && !self.scopes.contains(scope) {
                self.scopes.push(scope.clone());
            }
        }

        for (key, value) in &fresh.parameters {
            self.parameters.insert(key.clone(), value.clone());
        }
    }

    /// Join `scopes` with the configured separator
    #[must_use]
    pub fn format_scopes<S: AsRef<str>>(&self, scopes: &[S]) -> String {
        scopes
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(&self.scope_separator)
    }
}

/// Builder handed to registration callbacks
///
/// Values are stored as given; duplicate and empty scopes are only dropped
/// when the built configuration is merged into shared state.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ProviderConfigBuilder {
    config: ProviderConfig,
}

impl ProviderConfigBuilder {
    /// Set the client ID
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = client_id.into();
        self
    }

    /// Set the client secret
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.config.client_secret = client_secret.into();
        self
    }

    /// Set the redirect URL
    pub fn redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
        self.config.redirect_url = redirect_url.into();
        self
    }

    /// Enable or disable stateless mode
    pub fn stateless(mut self, stateless: bool) -> Self {
        self.config.stateless = stateless;
        self
    }

    /// Enable or disable PKCE
    pub fn with_pkce(mut self, uses_pkce: bool) -> Self {
        self.config.uses_pkce = uses_pkce;
        self
    }

    /// Set the scope separator
    pub fn scope_separator(mut self, separator: impl Into<String>) -> Self {
        self.config.scope_separator = separator.into();
        self
    }

    /// Append a scope
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.config.scopes.push(scope.into());
        self
    }

    /// Append several scopes
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Set an extra authorization parameter, replacing any previous value
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.parameters.insert(key.into(), value.into());
        self
    }

    /// Set several extra authorization parameters
    pub fn parameters<I, K, V>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.config
            .parameters
            .extend(parameters.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Apply an existing configuration, typically one loaded from a config
    /// file, on top of the values set so far
    ///
    /// Only non-default values of `config` are applied, so empty strings and
    /// unset flags never clear what the chain already set. Scopes are unioned
    /// and parameters overwritten key by key.
    pub fn extend(mut self, config: &ProviderConfig) -> Self {
        for (target, source) in [
            (&mut self.config.client_id, &config.client_id),
            (&mut self.config.client_secret, &config.client_secret),
            (&mut self.config.redirect_url, &config.redirect_url),
        ] {
            if !source.is_empty() {
                target.clone_from(source);
            }
        }

        if !config.scope_separator.is_empty() && config.scope_separator != DEFAULT_SCOPE_SEPARATOR {
            self.config.scope_separator.clone_from(&config.scope_separator);
        }

        self.config.stateless |= config.stateless;
        self.config.uses_pkce |= config.uses_pkce;

        for scope in &config.scopes {
            if !scope.is_empty() && !self.config.scopes.contains(scope) {
                self.config.scopes.push(scope.clone());
            }
        }

        for (key, value) in &config.parameters {
            self.config.parameters.insert(key.clone(), value.clone());
        }
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> ProviderConfig {
        self.config
    }
}

/// Authorization request produced by a provider redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// URL the user agent should be redirected to
    pub url: String,
    /// CSRF state to persist and verify on callback (`None` when stateless)
    pub state: Option<String>,
    /// PKCE verifier to persist for the token exchange (`None` without PKCE)
    pub pkce_verifier: Option<String>,
}

/// OAuth2 access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Access token
    pub access_token: String,
    /// Refresh token (if provided)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// When the token expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<SystemTime>,
    /// OAuth2 scopes granted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

impl OAuthToken {
    /// Check if the access token has expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires| SystemTime::now() > expires)
    }
}

/// User information from an OAuth2 provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthUserInfo {
    /// Provider-specific user ID
    pub provider_user_id: String,
    /// Email address
    pub email: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar/profile picture URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Whether email is verified
    pub email_verified: bool,
}

/// OAuth2 provider errors
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Provider configuration is unusable
    #[error("Invalid OAuth2 provider configuration: {0}")]
    InvalidConfig(String),

    /// PKCE verifier required but missing
    #[error("PKCE verifier is required for this provider")]
    MissingPkceVerifier,

    /// Authorization code exchange failed
    #[error("Failed to exchange authorization code for token: {0}")]
    TokenExchangeFailed(String),

    /// Failed to fetch user info
    #[error("Failed to fetch user information: {0}")]
    UserInfoFailed(String),

    /// Token expired
    #[error("OAuth2 token has expired")]
    TokenExpired,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn scopes(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_default_config_is_neutral() {
        let config = ProviderConfig::default();
        assert!(config.client_id.is_empty());
        assert!(config.client_secret.is_empty());
        assert!(config.redirect_url.is_empty());
        assert!(!config.stateless);
        assert!(!config.uses_pkce);
        assert_eq!(config.scope_separator, " ");
        assert!(config.scopes.is_empty());
        assert!(config.parameters.is_empty());
    }

    #[test]
    fn test_builder_keeps_values_as_given() {
        let config = ProviderConfig::builder()
            .client_id("id")
            .client_secret("secret")
            .redirect_url("http://localhost/callback")
            .stateless(true)
            .with_pkce(true)
            .scope_separator(",")
            .scopes(["a", "", "a"])
            .parameter("prompt", "consent")
            .build();

        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.redirect_url, "http://localhost/callback");
        assert!(config.stateless);
        assert!(config.uses_pkce);
        assert_eq!(config.scope_separator, ",");
        assert_eq!(config.scopes, scopes(&["a", "", "a"]));
        assert_eq!(config.parameters.get("prompt").map(String::as_str), Some("consent"));
    }

    #[test]
    fn test_merge_skips_empty_and_duplicate_scopes() {
        let fresh = ProviderConfig::builder().scopes(["a", "", "b", "a"]).build();
        let mut shared = ProviderConfig::default();
        shared.merge_from(&fresh);
        assert_eq!(shared.scopes, scopes(&["a", "b"]));
    }

    #[test]
    fn test_merge_scopes_are_case_sensitive() {
        let fresh = ProviderConfig::builder().scopes(["Email", "email"]).build();
        let mut shared = ProviderConfig::default();
        shared.merge_from(&fresh);
        assert_eq!(shared.scopes, scopes(&["Email", "email"]));
    }

    #[test]
    fn test_merge_keeps_existing_scope_order() {
        let mut shared = ProviderConfig::builder().scopes(["openid", "email"]).build();
        let fresh = ProviderConfig::builder().scopes(["profile", "openid"]).build();
        shared.merge_from(&fresh);
        assert_eq!(shared.scopes, scopes(&["openid", "email", "profile"]));
    }

    #[test]
    fn test_merge_overwrites_parameters_by_key() {
        let mut shared = ProviderConfig::builder()
            .parameter("x", "1")
            .parameter("keep", "yes")
            .build();
        let fresh = ProviderConfig::builder().parameter("x", "2").build();
        shared.merge_from(&fresh);

        assert_eq!(shared.parameters.len(), 2);
        assert_eq!(shared.parameters["x"], "2");
        assert_eq!(shared.parameters["keep"], "yes");
    }

    #[test]
    fn test_merge_overwrites_scalars() {
        let mut shared = ProviderConfig::builder()
            .client_id("old")
            .with_pkce(true)
            .build();
        let fresh = ProviderConfig::builder().client_id("new").build();
        shared.merge_from(&fresh);

        assert_eq!(shared.client_id, "new");
        assert!(!shared.uses_pkce);
    }

    #[test]
    fn test_extend_seeds_builder() {
        let file_config = ProviderConfig::builder()
            .client_id("from-file")
            .scope("openid")
            .build();

        let config = ProviderConfig::builder()
            .extend(&file_config)
            .scope("email")
            .build();

        assert_eq!(config.client_id, "from-file");
        assert_eq!(config.scopes, scopes(&["openid", "email"]));
    }

    #[test]
    fn test_extend_keeps_values_set_earlier() {
        let file_config = ProviderConfig::builder()
            .client_secret("file-secret")
            .scope("openid")
            .build();

        let config = ProviderConfig::builder()
            .client_id("x")
            .scope_separator(",")
            .with_pkce(true)
            .scope("email")
            .extend(&file_config)
            .build();

        assert_eq!(config.client_id, "x");
        assert_eq!(config.client_secret, "file-secret");
        assert_eq!(config.scope_separator, ",");
        assert!(config.uses_pkce);
        assert_eq!(config.scopes, scopes(&["email", "openid"]));
    }

    #[test]
    fn test_format_scopes_uses_separator() {
        let config = ProviderConfig::builder().scope_separator(",").build();
        assert_eq!(config.format_scopes(&["openid", "email"]), "openid,email");

        let config = ProviderConfig::default();
        assert_eq!(config.format_scopes(&["openid", "email"]), "openid email");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ProviderConfig = toml::from_str(
            r#"
            client_id = "abc"
            scopes = ["email"]
            "#,
        )
        .unwrap();

        assert_eq!(config.client_id, "abc");
        assert_eq!(config.scopes, scopes(&["email"]));
        assert_eq!(config.scope_separator, " ");
        assert!(!config.uses_pkce);
    }

    #[test]
    fn test_oauth_token_is_expired() {
        let token = OAuthToken {
            access_token: "test".to_string(),
            refresh_token: None,
            token_type: "Bearer".to_string(),
            expires_at: None,
            scopes: None,
        };
        assert!(!token.is_expired());

        let expired_token = OAuthToken {
            expires_at: Some(SystemTime::now() - Duration::from_secs(3600)),
            ..token
        };
        assert!(expired_token.is_expired());
    }
}
