//! Error types and error handling

use thiserror::Error;

/// Framework error type
#[derive(Debug, Error)]
pub enum SocialiteError {
    /// An argument was rejected before any work was done
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No driver is registered under the requested name
    #[error("Unknown social login driver: {0}")]
    UnknownDriver(String),

    /// No factory is registered for the requested type
    #[error("Service not registered: {0}")]
    ServiceNotRegistered(&'static str),

    /// A factory produced a value of the wrong type
    #[error("Service factory returned an unexpected type for {0}")]
    ServiceTypeMismatch(&'static str),

    /// The shared HTTP client could not be created
    #[error("HTTP client error: {0}")]
    Http(String),

    /// OAuth2 provider error
    #[error("OAuth2 error: {0}")]
    OAuth(#[from] crate::oauth2::types::OAuthError),
}
