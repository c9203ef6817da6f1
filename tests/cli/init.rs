use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, MESSAGES, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["sourceDir"], "src/main/resources");
    assert_eq!(parsed["sourceLanguage"], "en");
    assert_eq!(parsed["characterBudget"], 4000);
    assert_eq!(parsed["provider"], "google");
    assert!(
        parsed.get("apiKey").is_none(),
        "Config should not contain an API key"
    );

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Created"));
    let content = test.read_file(".propbabelrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".propbabelrc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains(".propbabelrc.json already exists"));
    assert_eq!(test.read_file(".propbabelrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file("src/main/resources/messages_en.properties", MESSAGES)?;

    // No API key in the environment: the run is skipped, not failed.
    let output = test.translate_command().output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("no API key available"));

    let output = test
        .translate_command()
        .args(["--provider", "pseudo", "--cache-dir", "cache", "--languages", "it"])
        .output()?;
    // The default config insists on an existing cache directory.
    assert_eq!(output.status.code(), Some(2));

    test.write_file("cache/.keep", "")?;
    let output = test
        .translate_command()
        .args(["--provider", "pseudo", "--cache-dir", "cache", "--languages", "it"])
        .output()?;
    assert!(output.status.success());
    assert!(test.root().join("target/classes/messages_it.properties").exists());

    Ok(())
}
