//! Explicit factory registry
//!
//! Types are registered with a constructor closure and a [`Lifetime`]. The
//! collection is mutable while the composition root is assembled; building it
//! yields a read-only [`ServiceProvider`] that resolves instances on demand.
//!
//! Providers registered here can additionally be bound as `dyn Provider`, so
//! that callers who want "every configured provider" resolve through the same
//! factories as callers asking for a concrete type.

use parking_lot::Mutex;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SocialiteError;
use crate::oauth2::provider::Provider;
use crate::oauth2::types::ProviderConfig;
use crate::socialite::store::ConfigStore;

type AnyService = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&ServiceProvider) -> Result<AnyService, SocialiteError> + Send + Sync>;
type ProviderCast = fn(AnyService) -> Option<Arc<dyn Provider>>;

/// How long a resolved instance lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// A new instance is constructed on every resolution
    Transient,
    /// The first instance is cached and handed out thereafter
    Shared,
}

struct ServiceDescriptor {
    type_name: &'static str,
    lifetime: Lifetime,
    factory: Factory,
}

struct ProviderBinding {
    type_id: TypeId,
    type_name: &'static str,
    cast: ProviderCast,
}

fn cast_provider<P: Provider + 'static>(service: AnyService) -> Option<Arc<dyn Provider>> {
    service
        .downcast::<P>()
        .ok()
        .map(|provider| provider as Arc<dyn Provider>)
}

/// Mutable set of service registrations
#[derive(Default)]
pub struct ServiceCollection {
    descriptors: HashMap<TypeId, ServiceDescriptor>,
    provider_bindings: Vec<ProviderBinding>,
}

impl ServiceCollection {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `T`
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&ServiceProvider) -> Result<T, SocialiteError> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |services: &ServiceProvider| {
            factory(services).map(|service| Arc::new(service) as AnyService)
        });

        let previous = self.descriptors.insert(
            TypeId::of::<T>(),
            ServiceDescriptor {
                type_name: type_name::<T>(),
                lifetime,
                factory,
            },
        );

        tracing::debug!(
            service = type_name::<T>(),
            ?lifetime,
            replaced = previous.is_some(),
            "Registered service factory"
        );
        self
    }

    /// Register a factory invoked on every resolution
    pub fn add_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&ServiceProvider) -> Result<T, SocialiteError> + Send + Sync + 'static,
    {
        self.register(Lifetime::Transient, factory)
    }

    /// Register a factory whose first result is reused
    pub fn add_shared<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&ServiceProvider) -> Result<T, SocialiteError> + Send + Sync + 'static,
    {
        self.register(Lifetime::Shared, factory)
    }

    /// Expose `P` through [`ServiceProvider::providers`]
    ///
    /// Binding the same type twice has no effect.
    pub fn bind_provider<P: Provider + 'static>(&mut self) -> &mut Self {
        let type_id = TypeId::of::<P>();
        if !self.provider_bindings.iter().any(|b| b.type_id == type_id) {
            self.provider_bindings.push(ProviderBinding {
                type_id,
                type_name: type_name::<P>(),
                cast: cast_provider::<P>,
            });
        }
        self
    }

    /// Whether a factory is registered for `T`
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.descriptors.contains_key(&TypeId::of::<T>())
    }

    /// Lifetime registered for `T`
    #[must_use]
    pub fn lifetime_of<T: 'static>(&self) -> Option<Lifetime> {
        self.descriptors
            .get(&TypeId::of::<T>())
            .map(|descriptor| descriptor.lifetime)
    }

    /// Type names bound as providers, in binding order
    #[must_use]
    pub fn bound_providers(&self) -> Vec<&'static str> {
        self.provider_bindings.iter().map(|b| b.type_name).collect()
    }

    /// Number of registered factories
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Freeze the collection together with the shared configuration and
    /// HTTP client
    #[must_use]
    pub fn build(self, config: Arc<ConfigStore>, http_client: reqwest::Client) -> ServiceProvider {
        ServiceProvider {
            descriptors: self.descriptors,
            provider_bindings: self.provider_bindings,
            shared: Mutex::new(HashMap::new()),
            config,
            http_client,
        }
    }
}

/// Read-only resolver built from a [`ServiceCollection`]
pub struct ServiceProvider {
    descriptors: HashMap<TypeId, ServiceDescriptor>,
    provider_bindings: Vec<ProviderBinding>,
    shared: Mutex<HashMap<TypeId, AnyService>>,
    config: Arc<ConfigStore>,
    http_client: reqwest::Client,
}

impl ServiceProvider {
    /// Resolve an instance of `T`
    ///
    /// # Errors
    ///
    /// Returns [`SocialiteError::ServiceNotRegistered`] if no factory exists
    /// for `T`, or the error returned by the factory
    pub fn resolve<T: Any + Send + Sync>(&self) -> Result<Arc<T>, SocialiteError> {
        self.resolve_any(TypeId::of::<T>(), type_name::<T>())?
            .downcast::<T>()
            .map_err(|_| SocialiteError::ServiceTypeMismatch(type_name::<T>()))
    }

    /// Resolve every type bound as a provider, in binding order
    ///
    /// # Errors
    ///
    /// Returns the first resolution error encountered
    pub fn providers(&self) -> Result<Vec<Arc<dyn Provider>>, SocialiteError> {
        self.provider_bindings
            .iter()
            .map(|binding| {
                let service = self.resolve_any(binding.type_id, binding.type_name)?;
                (binding.cast)(service).ok_or(SocialiteError::ServiceTypeMismatch(binding.type_name))
            })
            .collect()
    }

    /// Resolved configuration for provider `P`
    ///
    /// Falls back to [`ProviderConfig::default`] when `P` was never configured.
    #[must_use]
    pub fn config<P: 'static>(&self) -> ProviderConfig {
        self.config.get_or_default::<P>()
    }

    /// Shared configuration store
    #[must_use]
    pub fn config_store(&self) -> &ConfigStore {
        &self.config
    }

    /// HTTP client shared by all providers
    #[must_use]
    pub const fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn resolve_any(
        &self,
        type_id: TypeId,
        type_name: &'static str,
    ) -> Result<AnyService, SocialiteError> {
        let descriptor = self
            .descriptors
            .get(&type_id)
            .ok_or(SocialiteError::ServiceNotRegistered(type_name))?;

        match descriptor.lifetime {
            Lifetime::Transient => (descriptor.factory)(self),
            Lifetime::Shared => {
                if let Some(existing) = self.shared.lock().get(&type_id) {
                    return Ok(Arc::clone(existing));
                }
                // Factories may resolve other services, so the lock is not held here
                let created = (descriptor.factory)(self)?;
                tracing::trace!(service = descriptor.type_name, "Created shared service");
                Ok(Arc::clone(self.shared.lock().entry(type_id).or_insert(created)))
            }
        }
    }
}
