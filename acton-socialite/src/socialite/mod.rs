//! Provider registry and composition root
//!
//! Applications assemble social login once at startup:
//!
//! 1. create a [`SocialiteBuilder`]
//! 2. register providers through [`ProviderExtensions`] (e.g. `add_google`)
//! 3. call [`SocialiteBuilder::build`] to obtain a [`SocialiteManager`]
//!
//! After step 3 configuration and factories are read-only, and drivers are
//! resolved by name at request time.

pub mod builder;
pub mod extensions;
pub mod manager;
pub mod services;
pub mod store;

pub use builder::{DriverRegistration, SocialiteBuilder};
pub use extensions::ProviderExtensions;
pub use manager::SocialiteManager;
pub use services::{Lifetime, ServiceCollection, ServiceProvider};
pub use store::ConfigStore;
