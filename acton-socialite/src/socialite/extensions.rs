//! Provider registration extensions
//!
//! Each supported identity service gets one method here. A registration
//! merges the caller's settings into the shared configuration, declares how
//! the provider is constructed, and queues the driver name for the manager.

use crate::error::SocialiteError;
use crate::oauth2::providers::GoogleProvider;
use crate::oauth2::types::{ProviderConfig, ProviderConfigBuilder};
use crate::socialite::builder::{DriverRegistration, SocialiteBuilder};

/// Registration methods for the built-in providers
pub trait ProviderExtensions {
    /// Register the Google provider under the `"google"` driver name
    ///
    /// `configure` receives a builder starting from neutral defaults. The
    /// provider is constructed anew for every resolution.
    ///
    /// # Errors
    ///
    /// Returns [`SocialiteError::InvalidArgument`] if the builder has already
    /// been built. Nothing is registered and `configure` is not called in
    /// that case.
    fn add_google<F>(&mut self, configure: F) -> Result<&mut Self, SocialiteError>
    where
        F: FnOnce(ProviderConfigBuilder) -> ProviderConfigBuilder;
}

impl ProviderExtensions for SocialiteBuilder {
    fn add_google<F>(&mut self, configure: F) -> Result<&mut Self, SocialiteError>
    where
        F: FnOnce(ProviderConfigBuilder) -> ProviderConfigBuilder,
    {
        self.ensure_open()?;

        let options = configure(ProviderConfig::builder()).build();
        self.config_store_mut().configure::<GoogleProvider>(&options);

        self.services_mut()
            .add_transient(|services| {
                GoogleProvider::new(
                    services.config::<GoogleProvider>(),
                    services.http_client().clone(),
                )
                .map_err(SocialiteError::from)
            })
            .bind_provider::<GoogleProvider>();

        self.add_driver_registration(DriverRegistration::new(GoogleProvider::NAME, |manager| {
            manager.register_driver::<GoogleProvider>(GoogleProvider::NAME);
        }));

        tracing::debug!(driver = GoogleProvider::NAME, "Registered social login provider");
        Ok(self)
    }
}
