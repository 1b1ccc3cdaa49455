//! Composition root for social login
//!
//! The builder collects three kinds of registration while an application
//! boots:
//! - provider configuration, merged into a [`ConfigStore`]
//! - typed factories with an explicit [`Lifetime`](crate::socialite::Lifetime),
//!   collected in a [`ServiceCollection`]
//! - named [`DriverRegistration`]s, queued and applied when the
//!   [`SocialiteManager`] is built
//!
//! Once [`build`](SocialiteBuilder::build) has run the builder is finalized
//! and rejects further registrations.

use std::sync::Arc;

use crate::config::{HttpSettings, SocialiteConfig};
use crate::error::SocialiteError;
use crate::oauth2::http::build_client;
use crate::socialite::manager::SocialiteManager;
use crate::socialite::services::ServiceCollection;
use crate::socialite::store::ConfigStore;

/// A named driver registration waiting for the manager to be built
pub struct DriverRegistration {
    name: String,
    apply: Box<dyn FnOnce(&mut SocialiteManager) + Send>,
}

impl DriverRegistration {
    /// Queue `apply` under the driver name `name`
    #[must_use]
    pub fn new<F>(name: impl Into<String>, apply: F) -> Self
    where
        F: FnOnce(&mut SocialiteManager) + Send + 'static,
    {
        Self {
            name: name.into(),
            apply: Box::new(apply),
        }
    }

    /// Driver name this registration installs
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn apply(self, manager: &mut SocialiteManager) {
        tracing::trace!(driver = %self.name, "Applying driver registration");
        (self.apply)(manager);
    }
}

impl std::fmt::Debug for DriverRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Startup-time object that wires providers together
///
/// # Example
///
/// ```rust
/// use acton_socialite::prelude::*;
///
/// # fn example() -> Result<(), SocialiteError> {
/// let mut builder = SocialiteBuilder::new();
/// builder.add_google(|cfg| {
///     cfg.client_id("client-id")
///         .client_secret("client-secret")
///         .redirect_url("http://localhost:3000/auth/google/callback")
///         .scope("email")
/// })?;
///
/// let socialite = builder.build()?;
/// let google = socialite.driver("google")?;
/// let redirect = google.redirect()?;
/// assert!(redirect.url.starts_with("https://accounts.google.com"));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Default)]
pub struct SocialiteBuilder {
    http: HttpSettings,
    config: ConfigStore,
    services: ServiceCollection,
    driver_registrations: Vec<DriverRegistration>,
    finalized: bool,
}

impl SocialiteBuilder {
    /// Create a builder with default HTTP settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder using the HTTP settings of a loaded configuration
    ///
    /// Provider sections are not registered automatically; pass them to the
    /// matching extension method (see [`ProviderConfigBuilder::extend`](crate::oauth2::ProviderConfigBuilder::extend)).
    #[must_use]
    pub fn with_settings(config: &SocialiteConfig) -> Self {
        Self {
            http: config.http.clone(),
            ..Self::default()
        }
    }

    /// Shared provider configuration collected so far
    #[must_use]
    pub const fn config_store(&self) -> &ConfigStore {
        &self.config
    }

    /// Mutable access to the shared provider configuration
    pub fn config_store_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    /// Factories collected so far
    #[must_use]
    pub const fn services(&self) -> &ServiceCollection {
        &self.services
    }

    /// Mutable access to the factory registrations
    pub fn services_mut(&mut self) -> &mut ServiceCollection {
        &mut self.services
    }

    /// Driver registrations queued for the manager, in order
    #[must_use]
    pub fn driver_registrations(&self) -> &[DriverRegistration] {
        &self.driver_registrations
    }

    /// Queue a driver registration
    pub fn add_driver_registration(&mut self, registration: DriverRegistration) -> &mut Self {
        self.driver_registrations.push(registration);
        self
    }

    /// Whether [`build`](Self::build) has already run
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Fail if the builder no longer accepts registrations
    ///
    /// Extension methods call this before doing any work.
    ///
    /// # Errors
    ///
    /// Returns [`SocialiteError::InvalidArgument`] once the builder is finalized
    pub fn ensure_open(&self) -> Result<(), SocialiteError> {
        if self.finalized {
            return Err(SocialiteError::InvalidArgument(
                "socialite builder has already been built".to_string(),
            ));
        }
        Ok(())
    }

    /// Freeze all registrations and build the driver manager
    ///
    /// The configuration store and service collection move into the manager,
    /// queued driver registrations are applied in order, and the builder is
    /// left finalized and empty.
    ///
    /// # Errors
    ///
    /// Returns [`SocialiteError::InvalidArgument`] if called twice, or
    /// [`SocialiteError::Http`] if the shared HTTP client cannot be created
    pub fn build(&mut self) -> Result<SocialiteManager, SocialiteError> {
        self.ensure_open()?;

        let http_client = build_client(self.http.timeout(), &self.http.user_agent)
            .map_err(|e| SocialiteError::Http(e.to_string()))?;

        self.finalized = true;

        let config = Arc::new(std::mem::take(&mut self.config));
        let services = std::mem::take(&mut self.services).build(config, http_client);
        let registrations = std::mem::take(&mut self.driver_registrations);

        tracing::info!(
            registrations = registrations.len(),
            "Building socialite driver manager"
        );

        let mut manager = SocialiteManager::new(Arc::new(services));
        for registration in registrations {
            registration.apply(&mut manager);
        }

        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth2::types::ProviderConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Marker {}

    #[test]
    fn test_new_builder_is_empty() {
        let builder = SocialiteBuilder::new();
        assert!(builder.config_store().is_empty());
        assert!(builder.services().is_empty());
        assert!(builder.driver_registrations().is_empty());
        assert!(!builder.is_finalized());
        assert!(builder.ensure_open().is_ok());
    }

    #[test]
    fn test_with_settings_uses_http_settings() {
        let mut config = SocialiteConfig::default();
        config.http.timeout_secs = 3;
        let builder = SocialiteBuilder::with_settings(&config);
        assert_eq!(builder.http.timeout_secs, 3);
    }

    #[test]
    fn test_build_with_zero_timeout() {
        let mut config = SocialiteConfig::default();
        config.http.timeout_secs = 0;
        let mut builder = SocialiteBuilder::with_settings(&config);

        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_registrations_apply_in_order() {
        let order = Arc::new(AtomicUsize::new(0));
        let mut builder = SocialiteBuilder::new();

        for expected in 0..3 {
            let order = Arc::clone(&order);
            builder.add_driver_registration(DriverRegistration::new(
                format!("driver-{expected}"),
                move |_| {
                    assert_eq!(order.fetch_add(1, Ordering::SeqCst), expected);
                },
            ));
        }

        let names: Vec<&str> = builder.driver_registrations().iter().map(DriverRegistration::name).collect();
        assert_eq!(names, vec!["driver-0", "driver-1", "driver-2"]);

        builder.build().unwrap();
        assert_eq!(order.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_build_moves_config_into_manager() {
        let mut builder = SocialiteBuilder::new();
        builder
            .config_store_mut()
            .configure::<Marker>(&ProviderConfig::builder().client_id("abc").build());

        let manager = builder.build().unwrap();

        assert!(builder.config_store().is_empty());
        assert_eq!(manager.services().config::<Marker>().client_id, "abc");
    }

    #[test]
    fn test_build_twice_fails() {
        let mut builder = SocialiteBuilder::new();
        builder.build().unwrap();

        assert!(builder.is_finalized());
        assert!(matches!(builder.build(), Err(SocialiteError::InvalidArgument(_))));
    }
}
