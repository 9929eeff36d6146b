// Integration tests for layered configuration loading

use anyhow::Result;
use exotel_bridge::config::{Config, DEFAULT_PORT, DEFAULT_RESPONSE_TEXT};
use exotel_bridge::error::ConfigError;
use exotel_bridge::session::SessionConfig;
use std::collections::HashMap;
use std::time::Duration;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_without_file() -> Result<()> {
    let cfg = Config::load_with_env("/nonexistent/exotel-bridge", env_from(&[]))?;

    assert_eq!(cfg.server.bind, "0.0.0.0");
    assert_eq!(cfg.server.port, DEFAULT_PORT);
    assert_eq!(cfg.synthesis.base_url, "https://api.elevenlabs.io");
    assert_eq!(cfg.synthesis.output_format, "mp3_44100_128");
    assert_eq!(cfg.synthesis.stability, 0.5);
    assert_eq!(cfg.synthesis.similarity_boost, 0.75);
    assert_eq!(cfg.synthesis.timeout(), Duration::from_secs(30));
    assert_eq!(cfg.session.default_response_text, DEFAULT_RESPONSE_TEXT);
    assert!(cfg.synthesis.api_key.is_none());

    Ok(())
}

#[test]
fn test_missing_credentials_are_a_config_error() -> Result<()> {
    let cfg = Config::load_with_env("/nonexistent/exotel-bridge", env_from(&[]))?;

    assert!(matches!(
        cfg.synthesis.credentials(),
        Err(ConfigError::MissingCredential("ELEVENLABS_API_KEY"))
    ));

    let cfg = Config::load_with_env(
        "/nonexistent/exotel-bridge",
        env_from(&[("ELEVENLABS_API_KEY", "key")]),
    )?;
    assert!(matches!(
        cfg.synthesis.credentials(),
        Err(ConfigError::MissingCredential("ELEVENLABS_VOICE_ID"))
    ));

    Ok(())
}

#[test]
fn test_file_values_override_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bridge.toml");
    std::fs::write(
        &path,
        r#"
[server]
port = 9000

[synthesis]
voice_id = "file-voice"
output_format = "mp3_22050_32"
timeout_secs = 5

[session]
default_response_text = "Thanks for calling"
"#,
    )?;

    let cfg = Config::load_with_env(path.to_str().unwrap(), env_from(&[]))?;

    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.server.bind, "0.0.0.0");
    assert_eq!(cfg.synthesis.voice_id.as_deref(), Some("file-voice"));
    assert_eq!(cfg.synthesis.output_format, "mp3_22050_32");

    let session = SessionConfig::from_config(&cfg);
    assert_eq!(session.default_response_text, "Thanks for calling");
    assert_eq!(session.synthesis_timeout, Duration::from_secs(5));

    Ok(())
}

#[test]
fn test_environment_overrides_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bridge.toml");
    std::fs::write(&path, "[server]\nport = 9000\n\n[synthesis]\nvoice_id = \"file-voice\"\n")?;

    let cfg = Config::load_with_env(
        path.to_str().unwrap(),
        env_from(&[
            ("WEBSOCKET_PORT", "8765"),
            ("BRIDGE_BIND", "127.0.0.1"),
            ("ELEVENLABS_API_KEY", "env-key"),
            ("ELEVENLABS_VOICE_ID", "env-voice"),
        ]),
    )?;

    assert_eq!(cfg.server.port, 8765);
    assert_eq!(cfg.server.bind, "127.0.0.1");

    let credentials = cfg.synthesis.credentials()?;
    assert_eq!(credentials.api_key, "env-key");
    assert_eq!(credentials.voice_id, "env-voice");

    Ok(())
}

#[test]
fn test_invalid_port_is_rejected() {
    let result = Config::load_with_env(
        "/nonexistent/exotel-bridge",
        env_from(&[("WEBSOCKET_PORT", "not-a-port")]),
    );

    assert!(result.is_err());
}

#[test]
fn test_bundled_config_file_loads() -> Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/exotel-bridge");
    let cfg = Config::load_with_env(path, env_from(&[]))?;

    assert_eq!(cfg.server.port, DEFAULT_PORT);
    assert_eq!(cfg.session.default_response_text, DEFAULT_RESPONSE_TEXT);

    Ok(())
}
