use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, MESSAGES, PSEUDO_CONFIG, stderr, stdout};

const EXPECTED_FR: &str = "#Generated by propbabel. Edit the source bundle or add an override file instead.\n\
greeting=H3ll0 {0}\n\
farewell=By3\n";

#[test]
fn test_translate_with_pseudo_provider() -> Result<()> {
    let test = CliTest::pseudo_project()?;

    let output = test.translate_command().output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_snapshot!(test.read_file("out/messages_fr.properties")?, @r"
    #Generated by propbabel. Edit the source bundle or add an override file instead.
    greeting=H3ll0 {0}
    farewell=By3
    ");
    assert!(stdout(&output).contains("messages_fr: 2 translated, 0 from cache, 0 from override"));

    let cache = test.read_file("cache/messages_fr.properties")?;
    assert!(cache.contains("farewell="));
    assert!(cache.contains("|By3"));

    Ok(())
}

#[test]
fn test_second_run_reuses_cache() -> Result<()> {
    let test = CliTest::pseudo_project()?;
    test.translate_command().output()?;
    let cache_before = test.read_file("cache/messages_fr.properties")?;

    let output = test.translate_command().output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("messages_fr: 0 translated, 2 from cache, 0 from override"));
    assert!(stdout(&output).contains("0 provider calls"));
    assert_eq!(test.read_file("out/messages_fr.properties")?, EXPECTED_FR);
    assert_eq!(test.read_file("cache/messages_fr.properties")?, cache_before);

    Ok(())
}

#[test]
fn test_changed_value_is_retranslated() -> Result<()> {
    let test = CliTest::pseudo_project()?;
    test.translate_command().output()?;

    test.write_file("src/messages_en.properties", "greeting=Hello {0}\nfarewell=See you\n")?;
    let output = test.translate_command().output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("1 translated, 1 from cache"));
    assert!(test.read_file("out/messages_fr.properties")?.ends_with("farewell=S33 y0û\n"));

    Ok(())
}

#[test]
fn test_override_file_wins() -> Result<()> {
    let test = CliTest::pseudo_project()?;
    test.write_file("src/messages_fr.properties", "farewell=Salut\n")?;

    let output = test.translate_command().output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("1 translated, 0 from cache, 1 from override"));
    assert!(test.read_file("out/messages_fr.properties")?.ends_with("greeting=H3ll0 {0}\nfarewell=Salut\n"));
    assert!(!test.read_file("cache/messages_fr.properties")?.contains("farewell"));

    Ok(())
}

#[test]
fn test_override_files_are_not_translated() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".propbabelrc.json",
        r#"{
  "sourceDir": "src",
  "targetDir": "out",
  "cacheDir": "cache",
  "failOnMissingCacheDir": false,
  "languages": ["fr"],
  "provider": "pseudo",
  "includes": ["*.properties"]
}"#,
    )?;
    test.write_file("src/messages.properties", MESSAGES)?;
    test.write_file("src/messages_fr.properties", "farewell=Salut\n")?;

    let output = test.translate_command().output()?;
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("(override file for 'fr')"));
    assert!(out.contains("Finished 1 job:"));
    assert!(test.root().join("out/messages_fr.properties").exists());
    assert!(!test.root().join("out/messages_fr_fr.properties").exists());

    Ok(())
}

#[test]
fn test_recurse_mirrors_directories() -> Result<()> {
    let test = CliTest::pseudo_project()?;
    test.write_file("src/com/acme/labels_en.properties", "title=Menu\n")?;

    let output = test.translate_command().output()?;
    assert!(output.status.success());
    assert!(!test.root().join("out/com/acme/labels_fr.properties").exists());

    test.write_file(".propbabelrc.json", &PSEUDO_CONFIG.replace("\"sourceDir\"", "\"recurse\": true,\n  \"sourceDir\""))?;
    let output = test.translate_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("out/com/acme/labels_fr.properties")?,
        "#Generated by propbabel. Edit the source bundle or add an override file instead.\ntitle=m3ñû\n"
    );
    assert!(test.root().join("cache/com/acme/labels_fr.properties").exists());

    Ok(())
}

#[test]
fn test_languages_flag_overrides_config() -> Result<()> {
    let test = CliTest::pseudo_project()?;

    let output = test.translate_command().args(["--languages", "es,nl"]).output()?;

    assert!(output.status.success());
    assert!(test.root().join("out/messages_es.properties").exists());
    assert!(test.root().join("out/messages_nl.properties").exists());
    assert!(!test.root().join("out/messages_fr.properties").exists());

    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::pseudo_project()?;

    let output = test.translate_command().arg("--dry-run").output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("messages_fr: 2 to translate, 0 from cache, 0 from override"));
    assert!(!test.root().join("out").exists());
    assert!(!test.root().join("cache").exists());

    Ok(())
}

#[test]
fn test_missing_api_key_skips_run() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".propbabelrc.json", r#"{ "sourceDir": "src", "targetDir": "out" }"#)?;
    test.write_file("src/messages_en.properties", MESSAGES)?;

    let output = test.translate_command().output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("no API key available"));
    assert!(!test.root().join("out").exists());

    Ok(())
}

#[test]
fn test_missing_cache_dir_is_fatal_by_default() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".propbabelrc.json",
        r#"{ "sourceDir": "src", "cacheDir": "cache", "cacheGroup": "com.acme", "provider": "pseudo" }"#,
    )?;
    test.write_file("src/messages_en.properties", MESSAGES)?;

    let output = test.translate_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Cache directory"));

    test.write_file("cache/com.acme/.keep", "")?;
    let output = test.translate_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    Ok(())
}

#[test]
fn test_missing_source_dir() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".propbabelrc.json", PSEUDO_CONFIG)?;

    let output = test.translate_command().output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("does not exist, nothing to translate"));

    test.write_file(
        ".propbabelrc.json",
        &PSEUDO_CONFIG.replace("\"sourceDir\"", "\"failOnMissingSourceDir\": true,\n  \"sourceDir\""),
    )?;
    let output = test.translate_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Source directory"));

    Ok(())
}

#[test]
fn test_invalid_no_translate_pattern_is_fatal() -> Result<()> {
    let test = CliTest::pseudo_project()?;

    let output = test.translate_command().args(["--no-translate", "(unclosed"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("noTranslatePatterns"));

    Ok(())
}

#[test]
fn test_broken_source_fails_only_its_jobs() -> Result<()> {
    let test = CliTest::pseudo_project()?;
    test.write_file("src/broken_en.properties", "bad=\\uZZZZ\n")?;

    let output = test.translate_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("broken_fr: failed to parse source file"));
    assert!(out.contains("caused by: line 1: malformed \\uXXXX escape"));
    assert!(out.contains("1 job of 2 failed"));
    assert_eq!(test.read_file("out/messages_fr.properties")?, EXPECTED_FR);

    Ok(())
}

#[test]
fn test_verbose_lists_protected_patterns() -> Result<()> {
    let test = CliTest::pseudo_project()?;

    let output = test.translate_command().arg("-v").output()?;

    assert!(output.status.success());
    assert!(stderr(&output).contains("Will not translate content matching"));
    assert!(stdout(&output).contains("messages_fr: 2 translated"));

    Ok(())
}
