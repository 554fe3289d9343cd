use std::env;

use gluco_portal::{AppConfig, Env};
use serial_test::serial;

// Environment-variable manipulation is process-global, so these tests are
// serialized and each one restores a clean slate before reading.

fn clear_portal_env() {
    // SAFETY: tests touching the process environment run under #[serial],
    // so no other thread reads or writes these variables concurrently.
    unsafe {
        env::remove_var("APP_ENV");
        env::remove_var("API_BASE_URL");
        env::remove_var("PORTAL_JWT_SECRET");
        env::remove_var("BIND_ADDR");
    }
}

#[test]
#[serial]
fn default_config_is_safe_for_tests() {
    let config = AppConfig::default();
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:8000");
    assert!(!config.jwt_secret.is_empty());
}

#[test]
#[serial]
fn load_falls_back_to_local_defaults() {
    clear_portal_env();
    let config = AppConfig::load();
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:8000");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
}

#[test]
#[serial]
fn load_reads_explicit_overrides() {
    clear_portal_env();
    // SAFETY: serialized test, see clear_portal_env.
    unsafe {
        env::set_var("API_BASE_URL", "https://api.example.net");
        env::set_var("BIND_ADDR", "127.0.0.1:9999");
        env::set_var("PORTAL_JWT_SECRET", "override-secret");
    }

    let config = AppConfig::load();
    assert_eq!(config.api_base_url, "https://api.example.net");
    assert_eq!(config.bind_addr, "127.0.0.1:9999");
    assert_eq!(config.jwt_secret, "override-secret");

    clear_portal_env();
}

#[test]
#[serial]
fn production_mode_is_recognized() {
    clear_portal_env();
    // SAFETY: serialized test, see clear_portal_env.
    unsafe {
        env::set_var("APP_ENV", "production");
        env::set_var("API_BASE_URL", "https://api.example.net");
        env::set_var("PORTAL_JWT_SECRET", "prod-secret");
    }

    let config = AppConfig::load();
    assert_eq!(config.env, Env::Production);

    clear_portal_env();
}
