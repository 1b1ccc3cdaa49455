//! Named driver registry
//!
//! The manager maps a driver name such as `"google"` to a factory producing a
//! ready-to-use [`Provider`]. It is created by
//! [`SocialiteBuilder::build`](crate::socialite::SocialiteBuilder::build),
//! which applies every queued driver registration in order.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SocialiteError;
use crate::oauth2::provider::Provider;
use crate::socialite::services::ServiceProvider;

type DriverFactory = Arc<dyn Fn() -> Result<Arc<dyn Provider>, SocialiteError> + Send + Sync>;

/// Resolves driver names to provider instances
pub struct SocialiteManager {
    services: Arc<ServiceProvider>,
    drivers: HashMap<String, DriverFactory>,
}

impl SocialiteManager {
    /// Create a manager with no drivers
    #[must_use]
    pub fn new(services: Arc<ServiceProvider>) -> Self {
        Self {
            services,
            drivers: HashMap::new(),
        }
    }

    /// Register provider type `P` under `name`
    ///
    /// Each call to [`driver`](Self::driver) resolves `P` through the service
    /// registry, so the registered lifetime applies.
    pub fn register_driver<P: Provider + 'static>(&mut self, name: impl Into<String>) -> &mut Self {
        let services = Arc::clone(&self.services);
        self.extend(name, move || Ok(services.resolve::<P>()? as Arc<dyn Provider>))
    }

    /// Register a custom driver factory under `name`
    ///
    /// Registering a name twice keeps the last factory.
    pub fn extend<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Arc<dyn Provider>, SocialiteError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.drivers.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::warn!(driver = %name, "Driver registered more than once, keeping the last registration");
        } else {
            tracing::debug!(driver = %name, "Registered driver");
        }
        self
    }

    /// Construct the provider registered under `name`
    ///
    /// # Errors
    ///
    /// Returns [`SocialiteError::UnknownDriver`] if nothing is registered under
    /// `name`, or the error raised while constructing the provider
    pub fn driver(&self, name: &str) -> Result<Arc<dyn Provider>, SocialiteError> {
        let factory = self
            .drivers
            .get(name)
            .ok_or_else(|| SocialiteError::UnknownDriver(name.to_string()))?;
        factory()
    }

    /// Whether a driver is registered under `name`
    #[must_use]
    pub fn has_driver(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Registered driver names, sorted
    #[must_use]
    pub fn drivers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every provider bound in the service registry
    ///
    /// # Errors
    ///
    /// Returns the first error raised while constructing a provider
    pub fn providers(&self) -> Result<Vec<Arc<dyn Provider>>, SocialiteError> {
        self.services.providers()
    }

    /// Service registry backing this manager
    #[must_use]
    pub fn services(&self) -> &ServiceProvider {
        &self.services
    }
}
