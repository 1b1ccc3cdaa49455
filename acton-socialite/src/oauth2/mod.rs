//! OAuth2 provider types and implementations
//!
//! This module holds everything a driver needs once it has been resolved:
//! - [`ProviderConfig`] and its builder
//! - the [`Provider`] driver contract
//! - the shared HTTP transport used for token exchange
//! - concrete providers (currently Google)
//!
//! Protocol details such as PKCE challenges, CSRF tokens and the token
//! request encoding are delegated to the `oauth2` crate.

pub mod http;
pub mod provider;
pub mod providers;
pub mod types;

pub use provider::Provider;
pub use providers::GoogleProvider;
pub use types::{
    AuthorizationRequest, OAuthError, OAuthToken, OAuthUserInfo, ProviderConfig,
    ProviderConfigBuilder,
};
