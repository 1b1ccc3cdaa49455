//! acton-socialite: pluggable OAuth2 social login for Acton applications
//!
//! Identity providers are registered once at startup into a composition
//! root, then resolved by driver name (`"google"`) whenever a login starts.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_socialite::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! acton_socialite::observability::init()?;
//!
//! let mut builder = SocialiteBuilder::new();
//! builder.add_google(|cfg| {
//!     cfg.client_id(std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default())
//!         .client_secret(std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default())
//!         .redirect_url("http://localhost:3000/auth/google/callback")
//!         .with_pkce(true)
//!         .scope("email")
//! })?;
//!
//! let socialite = builder.build()?;
//! let redirect = socialite.driver("google")?.redirect()?;
//! println!("Redirect the user to {}", redirect.url);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//!
//! - Provider settings live in an explicit [`ConfigStore`](socialite::ConfigStore),
//!   populated during startup and read-only afterwards
//! - Construction is declared through a factory registry with an explicit
//!   [`Lifetime`](socialite::Lifetime); providers are transient
//! - Driver names are queued on the builder and installed when the
//!   [`SocialiteManager`](socialite::SocialiteManager) is built

pub mod config;
pub mod error;
pub mod oauth2;
pub mod observability;
pub mod socialite;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_socialite::prelude::*;
    //! ```

    pub use crate::config::SocialiteConfig;
    pub use crate::error::SocialiteError;
    pub use crate::oauth2::{
        AuthorizationRequest, GoogleProvider, OAuthError, OAuthToken, OAuthUserInfo, Provider,
        ProviderConfig, ProviderConfigBuilder,
    };
    pub use crate::socialite::{
        DriverRegistration, Lifetime, ProviderExtensions, SocialiteBuilder, SocialiteManager,
    };
}
