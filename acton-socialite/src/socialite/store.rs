//! Shared provider configuration
//!
//! The store owns the long-lived copy of every provider's settings, keyed by
//! provider type. It is populated through `&mut` access while the
//! composition root is being assembled and is frozen behind an `Arc` once the
//! manager is built.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use crate::oauth2::types::ProviderConfig;

#[derive(Debug)]
struct Entry {
    type_name: &'static str,
    config: ProviderConfig,
}

/// Provider configuration keyed by provider type
#[derive(Debug, Default)]
pub struct ConfigStore {
    entries: HashMap<TypeId, Entry>,
}

impl ConfigStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `fresh` into the configuration stored for provider `P`
    ///
    /// The entry starts from [`ProviderConfig::default`] the first time a
    /// provider is configured. See [`ProviderConfig::merge_from`] for the
    /// merge rules.
    pub fn configure<P: 'static>(&mut self, fresh: &ProviderConfig) {
        let entry = self.entries.entry(TypeId::of::<P>()).or_insert_with(|| Entry {
            type_name: type_name::<P>(),
            config: ProviderConfig::default(),
        });
        entry.config.merge_from(fresh);

        tracing::debug!(
            provider = entry.type_name,
            scopes = ?entry.config.scopes,
            parameters = entry.config.parameters.len(),
            "Merged provider configuration"
        );
    }

    /// Configuration stored for provider `P`
    #[must_use]
    pub fn get<P: 'static>(&self) -> Option<&ProviderConfig> {
        self.entries.get(&TypeId::of::<P>()).map(|entry| &entry.config)
    }

    /// Configuration stored for provider `P`, or the defaults when the
    /// provider was never configured
    #[must_use]
    pub fn get_or_default<P: 'static>(&self) -> ProviderConfig {
        self.get::<P>().cloned().unwrap_or_default()
    }

    /// Number of configured providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no provider has been configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
