//! Google OAuth2 provider implementation

use async_trait::async_trait;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, TokenResponse, TokenUrl,
};
use serde::Deserialize;

use crate::oauth2::http::execute;
use crate::oauth2::provider::Provider;
use crate::oauth2::types::{
    AuthorizationRequest, ConfiguredClient, OAuthError, OAuthToken, OAuthUserInfo, ProviderConfig,
};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Authorization parameters written by the OAuth2 flow itself
const RESERVED_PARAMETERS: [&str; 6] = [
    "response_type",
    "client_id",
    "redirect_uri",
    "state",
    "code_challenge",
    "code_challenge_method",
];

/// Google OAuth2 provider
pub struct GoogleProvider {
    client: ConfiguredClient,
    config: ProviderConfig,
    http_client: reqwest::Client,
}

impl GoogleProvider {
    /// Driver name the provider registers under
    pub const NAME: &'static str = "google";

    /// Scopes always requested from Google, ahead of configured scopes
    pub const DEFAULT_SCOPES: [&'static str; 3] = ["openid", "profile", "email"];

    /// Create a new Google OAuth2 provider
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidConfig`] if the client ID is empty, the
    /// redirect URL is not a valid URL, or an extra parameter would clash with
    /// one the authorization flow sets itself
    pub fn new(config: ProviderConfig, http_client: reqwest::Client) -> Result<Self, OAuthError> {
        if config.client_id.is_empty() {
            return Err(OAuthError::InvalidConfig("client_id is empty".to_string()));
        }

        if let Some(key) = config
            .parameters
            .keys()
            .find(|key| RESERVED_PARAMETERS.contains(&key.as_str()))
        {
            return Err(OAuthError::InvalidConfig(format!(
                "parameter `{key}` is set by the authorization flow"
            )));
        }

        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(AUTH_URL.to_string())
                    .map_err(|e| OAuthError::InvalidConfig(format!("Invalid auth URL: {e}")))?,
            )
            .set_token_uri(
                TokenUrl::new(TOKEN_URL.to_string())
                    .map_err(|e| OAuthError::InvalidConfig(format!("Invalid token URL: {e}")))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_url.clone())
                    .map_err(|e| OAuthError::InvalidConfig(format!("Invalid redirect URL: {e}")))?,
            );

        Ok(Self {
            client,
            config,
            http_client,
        })
    }

    /// Scopes sent with the authorization request
    ///
    /// Default scopes come first, followed by configured scopes not already
    /// present.
    #[must_use]
    pub fn requested_scopes(&self) -> Vec<&str> {
        let mut scopes: Vec<&str> = Self::DEFAULT_SCOPES.to_vec();
        for scope in &self.config.scopes {
            if !scope.is_empty() && !scopes.contains(&scope.as_str()) {
                scopes.push(scope);
            }
        }
        scopes
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn redirect(&self) -> Result<AuthorizationRequest, OAuthError> {
        // Scopes go in as a single extra param so the configured separator is honoured.
        // A `scope` parameter replaces the computed list.
        let scope = self
            .config
            .parameters
            .get("scope")
            .cloned()
            .unwrap_or_else(|| self.config.format_scopes(&self.requested_scopes()));

        let mut request = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_extra_param("scope", scope);

        for (key, value) in self.config.parameters.iter().filter(|(key, _)| *key != "scope") {
            request = request.add_extra_param(key.as_str(), value.as_str());
        }

        let pkce_verifier = if self.config.uses_pkce {
            let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
            request = request.set_pkce_challenge(pkce_challenge);
            Some(pkce_verifier.secret().clone())
        } else {
            None
        };

        let (url, csrf_state) = request.url();

        Ok(AuthorizationRequest {
            url: url.to_string(),
            state: (!self.config.stateless).then(|| csrf_state.secret().clone()),
            pkce_verifier,
        })
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: Option<&str>,
    ) -> Result<OAuthToken, OAuthError> {
        let mut request = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()));

        if self.config.uses_pkce {
            let verifier = pkce_verifier.ok_or(OAuthError::MissingPkceVerifier)?;
            request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier.to_string()));
        }

        let http_client = self.http_client.clone();
        let send = move |req: oauth2::HttpRequest| execute(http_client.clone(), req);

        let token_response = request
            .request_async(&send)
            .await
            .map_err(|e| OAuthError::TokenExchangeFailed(e.to_string()))?;

        Ok(OAuthToken {
            access_token: token_response.access_token().secret().clone(),
            refresh_token: token_response
                .refresh_token()
                .map(|t| t.secret().clone()),
            token_type: "Bearer".to_string(),
            expires_at: token_response
                .expires_in()
                .map(|duration| std::time::SystemTime::now() + duration),
            scopes: token_response
                .scopes()
                .map(|scopes| scopes.iter().map(|s| s.to_string()).collect()),
        })
    }

    async fn user(&self, token: &OAuthToken) -> Result<OAuthUserInfo, OAuthError> {
        if token.is_expired() {
            return Err(OAuthError::TokenExpired);
        }

        let response = self
            .http_client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| OAuthError::UserInfoFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OAuthError::UserInfoFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let google_user: GoogleUserInfo = response
            .json()
            .await
            .map_err(|e| OAuthError::UserInfoFailed(format!("Failed to parse JSON: {e}")))?;

        Ok(google_user.into())
    }
}

/// Google OpenID Connect userinfo response
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: String,
    email_verified: Option<bool>,
    name: Option<String>,
    picture: Option<String>,
}

impl From<GoogleUserInfo> for OAuthUserInfo {
    fn from(user: GoogleUserInfo) -> Self {
        Self {
            provider_user_id: user.sub,
            email: user.email,
            name: user.name,
            avatar_url: user.picture,
            email_verified: user.email_verified.unwrap_or(false),
        }
    }
}
