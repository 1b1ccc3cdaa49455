//! OAuth2 provider implementations
//!
//! One module per identity service. Each provider is registered with the
//! composition root through its own extension method (see
//! [`crate::socialite::extensions`]).

pub mod google;

pub use google::GoogleProvider;
