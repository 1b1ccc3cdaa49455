//! Integration tests for Google provider registration
//!
//! Covers the full bootstrap path: configuring the provider through the
//! builder, building the manager, and resolving the `"google"` driver.
//!
//! Token exchange against Google itself is not exercised here; it would
//! require a mock authorization server.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use acton_socialite::prelude::*;

const REDIRECT_URL: &str = "http://localhost:3000/auth/google/callback";

fn stored_config(builder: &SocialiteBuilder) -> ProviderConfig {
    builder
        .config_store()
        .get::<GoogleProvider>()
        .cloned()
        .expect("google should be configured")
}

#[test]
fn test_end_to_end_registration() {
    let mut builder = SocialiteBuilder::new();
    builder
        .add_google(|cfg| cfg.client_id("abc").scope("email"))
        .expect("registration should succeed");

    let config = stored_config(&builder);
    assert_eq!(config.client_id, "abc");
    assert_eq!(config.scopes, vec!["email".to_string()]);

    let names: Vec<&str> = builder
        .driver_registrations()
        .iter()
        .map(DriverRegistration::name)
        .collect();
    assert_eq!(names, vec!["google"]);
}

#[test]
fn test_scope_merge_skips_empty_and_duplicates() {
    let mut builder = SocialiteBuilder::new();
    builder
        .add_google(|cfg| cfg.scopes(["a", "", "b", "a"]))
        .unwrap();

    assert_eq!(
        stored_config(&builder).scopes,
        vec!["a".to_string(), "b".to_string()]
    );
}

#[test]
fn test_registering_twice_is_idempotent_for_scopes() {
    let mut builder = SocialiteBuilder::new();
    for _ in 0..2 {
        builder
            .add_google(|cfg| cfg.scopes(["openid", "email"]))
            .unwrap();
    }

    assert_eq!(
        stored_config(&builder).scopes,
        vec!["openid".to_string(), "email".to_string()]
    );
}

#[test]
fn test_parameters_overwrite_by_key() {
    let mut builder = SocialiteBuilder::new();
    builder.add_google(|cfg| cfg.parameter("x", "1")).unwrap();
    builder.add_google(|cfg| cfg.parameter("x", "2")).unwrap();

    let expected: BTreeMap<String, String> = [("x".to_string(), "2".to_string())].into();
    assert_eq!(stored_config(&builder).parameters, expected);
}

#[test]
fn test_registration_after_build_is_rejected() {
    let mut builder = SocialiteBuilder::new();
    builder
        .add_google(|cfg| cfg.client_id("abc").redirect_url(REDIRECT_URL))
        .unwrap();
    let manager = builder.build().unwrap();

    let mut called = false;
    let result = builder.add_google(|cfg| {
        called = true;
        cfg
    });

    assert!(matches!(result, Err(SocialiteError::InvalidArgument(_))));
    assert!(!called);
    assert!(builder.driver_registrations().is_empty());
    assert_eq!(manager.drivers(), vec!["google"]);
}

#[test]
fn test_build_and_resolve_google_driver() {
    let mut builder = SocialiteBuilder::new();
    builder
        .add_google(|cfg| {
            cfg.client_id("abc")
                .client_secret("secret")
                .redirect_url(REDIRECT_URL)
                .with_pkce(true)
                .scope("https://www.googleapis.com/auth/calendar.readonly")
                .parameter("access_type", "offline")
        })
        .unwrap();

    let socialite = builder.build().unwrap();
    assert!(socialite.has_driver("google"));

    let google = socialite.driver("google").unwrap();
    assert_eq!(google.name(), "google");
    assert_eq!(google.config().client_id, "abc");

    let redirect = google.redirect().unwrap();
    assert!(redirect.url.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
    assert!(redirect.url.contains("client_id=abc"));
    assert!(redirect.url.contains("access_type=offline"));
    assert!(redirect.url.contains("calendar.readonly"));
    assert!(redirect.state.is_some());
    assert!(redirect.pkce_verifier.is_some());
}

#[test]
fn test_generic_provider_lookup_uses_same_factory() {
    let mut builder = SocialiteBuilder::new();
    builder
        .add_google(|cfg| cfg.client_id("abc").redirect_url(REDIRECT_URL))
        .unwrap();
    let socialite = builder.build().unwrap();

    let providers = socialite.providers().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].name(), "google");

    let by_name = socialite.driver("google").unwrap();
    assert!(!Arc::ptr_eq(&providers[0], &by_name));
    assert_eq!(providers[0].config(), by_name.config());
}

#[test]
fn test_invalid_config_surfaces_on_resolution() {
    let mut builder = SocialiteBuilder::new();
    builder.add_google(|cfg| cfg.client_id("abc")).unwrap();
    let socialite = builder.build().unwrap();

    let result = socialite.driver("google");
    assert!(matches!(
        result,
        Err(SocialiteError::OAuth(OAuthError::InvalidConfig(_)))
    ));
}

#[test]
fn test_unknown_driver() {
    let socialite = SocialiteBuilder::new().build().unwrap();
    assert!(matches!(
        socialite.driver("google"),
        Err(SocialiteError::UnknownDriver(_))
    ));
}

#[test]
fn test_register_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [http]
        timeout_secs = 5

        [providers.google]
        client_id = "from-file"
        client_secret = "secret"
        redirect_url = "{REDIRECT_URL}"
        scopes = ["openid"]
        "#
    )
    .unwrap();

    let config = SocialiteConfig::load_from(file.path().to_str().unwrap()).unwrap();
    let google = config.provider("google").unwrap();

    let mut builder = SocialiteBuilder::with_settings(&config);
    builder
        .add_google(|cfg| cfg.extend(google).scope("email"))
        .unwrap();

    let stored = stored_config(&builder);
    assert_eq!(stored.client_id, "from-file");
    assert_eq!(stored.scopes, vec!["openid".to_string(), "email".to_string()]);

    let socialite = builder.build().unwrap();
    assert_eq!(socialite.driver("google").unwrap().config().client_id, "from-file");
}

#[test]
fn test_reserved_parameter_surfaces_on_resolution() {
    let mut builder = SocialiteBuilder::new();
    builder
        .add_google(|cfg| {
            cfg.client_id("abc")
                .redirect_url(REDIRECT_URL)
                .parameter("response_type", "token")
        })
        .unwrap();
    let socialite = builder.build().unwrap();

    assert!(matches!(
        socialite.driver("google"),
        Err(SocialiteError::OAuth(OAuthError::InvalidConfig(_)))
    ));
}
