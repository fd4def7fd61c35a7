#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing
)]
//! Integration tests for configuration resolution: merge precedence,
//! batched prompting, and the persisted `<platform>.config.json`.

mod common;

use common::{MemoryLog, ProjectFixture, ScriptedPrompter, values};
use platform_config_cli::commands::apply::ApplyPlan;
use platform_config_cli::config::{ConfigValues, ConfigurationResolver};
use platform_config_cli::error::{ConfigError, Error};
use platform_config_cli::fs::OsFileSystem;
use platform_config_cli::platform::Platform;

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Defaults `{A:1}`, platform file `{A:2,B:3}`, overrides `{C:4}`.
#[tokio::test]
async fn platform_file_beats_defaults_beats_overrides() {
    let fixture = ProjectFixture::new();
    fixture.write(".wx/config.json", r#"{ "ios": { "A": "1" } }"#);
    fixture.write("ios.config.json", r#"{ "A": "2", "B": "3" }"#);
    let resolver = ConfigurationResolver::from_spec("A,B,C", fixture.root_path(), "ios");
    let prompter = ScriptedPrompter::default();

    let resolved = resolver
        .get_configuration(&values(&[("C", "4")]), &OsFileSystem, &prompter, &MemoryLog::new())
        .await
        .unwrap();

    assert_eq!(resolved, values(&[("A", "2"), ("B", "3"), ("C", "4")]));
    assert!(prompter.batches().is_empty());
}

/// `A` is known, so `B` and `C` are asked together once and all three land
/// in the persisted file.
#[tokio::test]
async fn missing_values_are_prompted_once_and_persisted() {
    let fixture = ProjectFixture::new();
    fixture.write("android.config.json", r#"{ "A": "known" }"#);
    let resolver = ConfigurationResolver::from_spec("A,B|bee?,C", fixture.root_path(), "android");
    let prompter = ScriptedPrompter::answering(&[("B", "bee"), ("C", "sea")]);

    let resolved = resolver
        .get_configuration(&ConfigValues::new(), &OsFileSystem, &prompter, &MemoryLog::new())
        .await
        .unwrap();

    assert_eq!(prompter.batches(), vec![vec!["B".to_string(), "C".to_string()]]);
    assert_eq!(resolved, values(&[("A", "known"), ("B", "bee"), ("C", "sea")]));
    insta::assert_snapshot!(fixture.read("android.config.json").trim_end(), @r#"
    {
        "A": "known",
        "B": "bee",
        "C": "sea"
    }
    "#);
}

#[tokio::test]
async fn malformed_defaults_file_is_a_parse_error() {
    let fixture = ProjectFixture::new();
    fixture.write(".wx/config.json", "{ \"ios\": ");
    let resolver = ConfigurationResolver::from_spec("A", fixture.root_path(), "ios");

    let err = resolver
        .get_configuration(
            &ConfigValues::new(),
            &OsFileSystem,
            &ScriptedPrompter::default(),
            &MemoryLog::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
    assert!(!fixture.exists("ios.config.json"));
}

// ---------------------------------------------------------------------------
// Full pass
// ---------------------------------------------------------------------------

/// A first run prompts for everything the schema needs and patches with the
/// answers; a second run reuses the persisted file without prompting.
#[tokio::test]
async fn answers_are_reused_on_the_next_run() {
    let fixture = ProjectFixture::new();
    let plan = ApplyPlan::new(Platform::Android, fixture.root_path());
    let first = ScriptedPrompter::answering(&[
        ("AppId", "com.example.first"),
        ("AppName", "First"),
        ("SplashText", "Hi"),
        ("WeexBundle", "index.we"),
    ]);

    let log = MemoryLog::new();
    plan.execute(&OsFileSystem, &first, &log).await.unwrap();

    assert_eq!(first.batches().len(), 1);
    assert_eq!(first.batches()[0].len(), 4);
    assert!(fixture.read("platforms/android/build.gradle").contains("com.example.first"));
    assert_eq!(log.stages(), ["Build android configuration", "Patch android project"]);

    let second = ScriptedPrompter::default();
    plan.execute(&OsFileSystem, &second, &MemoryLog::new())
        .await
        .unwrap();
    assert!(second.batches().is_empty());
}

/// Values given on the command line are written to the platform file along
/// with the prompted ones.
#[tokio::test]
async fn overrides_are_persisted_with_answers() {
    let fixture = ProjectFixture::new();
    let mut plan = ApplyPlan::new(Platform::Android, fixture.root_path());
    plan.overrides = values(&[("AppId", "com.cli"), ("AppName", "Cli"), ("SplashText", "Hey")]);
    let prompter = ScriptedPrompter::answering(&[("WeexBundle", "https://host/app.js")]);

    plan.execute(&OsFileSystem, &prompter, &MemoryLog::new())
        .await
        .unwrap();

    let saved: ConfigValues =
        serde_json::from_str(&fixture.read("android.config.json")).unwrap();
    assert_eq!(saved["AppId"], "com.cli");
    assert_eq!(saved["WeexBundle"], "https://host/app.js");
    assert_eq!(prompter.batches(), vec![vec!["WeexBundle".to_string()]]);
}

/// Dry-run still persists prompted answers but leaves the project untouched.
#[tokio::test]
async fn dry_run_persists_config_but_not_project() {
    let fixture = ProjectFixture::new();
    let mut plan = ApplyPlan::new(Platform::Android, fixture.root_path());
    plan.dry_run = true;
    let prompter = ScriptedPrompter::answering(&[
        ("AppId", "com.dry"),
        ("AppName", "Dry"),
        ("SplashText", "Hi"),
        ("WeexBundle", "index.we"),
    ]);

    let outcomes = plan
        .execute(&OsFileSystem, &prompter, &MemoryLog::new())
        .await
        .unwrap();

    assert!(outcomes.iter().any(|o| o.changed));
    assert!(fixture.exists("android.config.json"));
    assert_eq!(fixture.read("platforms/android/build.gradle"), common::BUILD_GRADLE);
}

#[tokio::test]
async fn config_error_aborts_before_patching() {
    let fixture = ProjectFixture::new();
    fixture.write("ios.config.json", r#"{ "AppName": { "nested": true } }"#);
    let plan = ApplyPlan::new(Platform::Ios, fixture.root_path());
    let log = MemoryLog::new();

    let err = plan
        .execute(&OsFileSystem, &ScriptedPrompter::default(), &log)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::Parse { .. })), "got {err:?}");
    assert!(log.files().is_empty());
    assert_eq!(
        fixture.read("platforms/ios/WeexDemo/WeexDemo-Info.plist"),
        common::INFO_PLIST
    );
}
