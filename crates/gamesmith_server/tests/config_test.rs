//! Configuration file layering.

use gamesmith_server::GamesmithConfig;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.path().join("gamesmith.toml");
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn test_file_overrides_bundled_defaults() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[server]
bind = "0.0.0.0:9090"

[gemini]
model = "gemini-2.5-flash"
request_timeout_secs = 30

[prompt]
max_chars = 500
"#,
    )?;

    let config = GamesmithConfig::from_file(&path)?;

    assert_eq!(config.server().bind(), "0.0.0.0:9090");
    assert_eq!(config.gemini().model(), "gemini-2.5-flash");
    assert_eq!(config.gemini().request_timeout(), Duration::from_secs(30));
    assert_eq!(config.prompt().max_chars, 500);
    assert_eq!(config.prompt().min_chars, 10, "untouched values keep defaults");
    assert_eq!(config.storage().root(), Path::new("games"));
    assert_eq!(*config.gemini().max_output_tokens(), 8192);
    Ok(())
}

#[test]
fn test_frontend_index_is_optional() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[server]
bind = "127.0.0.1:8000"
frontend_index = "static/index.html"
"#,
    )?;

    let config = GamesmithConfig::from_file(&path)?;
    assert_eq!(
        config.server().frontend_index().as_deref(),
        Some(Path::new("static/index.html"))
    );
    Ok(())
}

#[test]
fn test_missing_file_fails() {
    let err = GamesmithConfig::from_file("/nonexistent/gamesmith.toml").unwrap_err();
    assert!(err.message.contains("Failed to build configuration"));
}

#[test]
fn test_wrong_type_fails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[gemini]\nrequest_timeout_secs = \"soon\"\n")?;

    let err = GamesmithConfig::from_file(&path).unwrap_err();
    assert!(err.message.contains("Failed to parse configuration"));
    Ok(())
}

#[test]
fn test_inverted_prompt_bounds_fail() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[prompt]\nmin_chars = 50\nmax_chars = 20\n")?;

    let err = GamesmithConfig::from_file(&path).unwrap_err();
    assert!(err.message.contains("min_chars"));
    assert_eq!(err.setting, Some("prompt.min_chars"));
    Ok(())
}

#[test]
fn test_zero_timeout_fails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[gemini]\nrequest_timeout_secs = 0\n")?;

    let err = GamesmithConfig::from_file(&path).unwrap_err();
    assert_eq!(err.setting, Some("gemini.request_timeout_secs"));
    Ok(())
}
