//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;

use rk_registry::config::Config;
use rk_registry::CodecFormat;
use serial_test::serial;

fn clear() {
    env::remove_var("ROLE_DIR");
    env::remove_var("ROLE_STATE_FORMAT");
    env::remove_var("ROLE_STATE_FILE");
}

#[test]
#[serial]
fn test_defaults() {
    clear();

    let config = Config::from_env().unwrap();
    assert_eq!(config.role_dir, PathBuf::from("assets/role"));
    assert_eq!(config.state_format, CodecFormat::Json);
    assert_eq!(config.state_file, None);
}

#[test]
#[serial]
fn test_overrides() {
    clear();
    env::set_var("ROLE_DIR", "/srv/roles");
    env::set_var("ROLE_STATE_FORMAT", "bson");
    env::set_var("ROLE_STATE_FILE", "/srv/state/alice.bson");

    let config = Config::from_env().unwrap();
    assert_eq!(config.role_dir, PathBuf::from("/srv/roles"));
    assert_eq!(config.state_format, CodecFormat::Bson);
    assert_eq!(config.state_file, Some(PathBuf::from("/srv/state/alice.bson")));

    clear();
}

#[test]
#[serial]
fn test_invalid_format_is_rejected() {
    clear();
    env::set_var("ROLE_STATE_FORMAT", "yaml");

    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("ROLE_STATE_FORMAT"));

    clear();
}

#[test]
fn test_default_for_test_matches_defaults() {
    let config = Config::default_for_test();
    assert_eq!(config.role_dir, PathBuf::from("assets/role"));
    assert_eq!(config.state_format, CodecFormat::Json);
}
