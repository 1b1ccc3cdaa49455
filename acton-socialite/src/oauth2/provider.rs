//! Driver contract implemented by every social-login provider

use async_trait::async_trait;

use super::types::{AuthorizationRequest, OAuthError, OAuthToken, OAuthUserInfo, ProviderConfig};

/// A pluggable OAuth2 identity provider
///
/// Instances are produced by the service registry from the provider's
/// resolved [`ProviderConfig`] and the shared HTTP client. They are created
/// per resolution and hold no state across requests.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Driver name this provider is usually registered under (e.g. "google")
    fn name(&self) -> &str;

    /// Configuration the provider was built from
    fn config(&self) -> &ProviderConfig;

    /// Build the authorization redirect for a login attempt
    ///
    /// # Errors
    ///
    /// Returns error if the configuration cannot produce a valid URL
    fn redirect(&self) -> Result<AuthorizationRequest, OAuthError>;

    /// Exchange an authorization code for an access token
    ///
    /// `pkce_verifier` must be supplied when the provider uses PKCE.
    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: Option<&str>,
    ) -> Result<OAuthToken, OAuthError>;

    /// Fetch the authenticated user
    async fn user(&self, token: &OAuthToken) -> Result<OAuthUserInfo, OAuthError>;
}
