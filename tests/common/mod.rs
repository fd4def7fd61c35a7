// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed project root with the demo Android
// and iOS native projects laid out under `platforms/`, plus test doubles for
// the logging and prompting collaborators.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use platform_config_cli::config::ConfigValues;
use platform_config_cli::error::ConfigError;
use platform_config_cli::logging::{FileEntry, Log, PatchStatus};
use platform_config_cli::prompt::{Prompter, Question};

pub const BUILD_GRADLE: &str = r#"apply plugin: 'com.android.application'

android {
    compileSdkVersion 23
    defaultConfig {
        applicationId "com.alibaba.weex"
        minSdkVersion 14
        versionCode 1
        versionName "1.0"
    }
}
"#;

pub const STRINGS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name" translatable="false">WeexApp</string>
    <string name="dummy_content">Hello, Weex!</string>
    <string name="action_settings">Settings</string>
</resources>
"#;

pub const APP_CONFIG_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<config>
    <preference name="launch_locally" value="false" />
    <preference name="local_url" value="file://assets/dist/index.js" />
    <preference name="launch_url" value="http://127.0.0.1:8080/dist/index.js" />
</config>
"#;

pub const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleDisplayName</key>
	<string>WeexDemo</string>
	<key>CFBundleIdentifier</key>
	<string>com.alibaba.weex.demo</string>
	<key>CFBundleShortVersionString</key>
	<string>1.0</string>
	<key>CFBundleVersion</key>
	<string>1</string>
</dict>
</plist>
"#;

pub const PROJECT_PBXPROJ: &str = r#"/* Begin XCBuildConfiguration section */
		775BEE7A1C1E8B3E00FE6D85 /* Release */ = {
			buildSettings = {
				"CODE_SIGN_IDENTITY[sdk=iphoneos*]" = "iPhone Developer";
				CODE_SIGN_IDENTITY = "iPhone Developer";
				PROVISIONING_PROFILE = "";
			};
		};
/* End XCBuildConfiguration section */
"#;

/// Build a value map from `(key, value)` pairs.
pub fn values(pairs: &[(&str, &str)]) -> ConfigValues {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// An isolated project root backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `platforms/android/`: Gradle demo project
/// - `platforms/ios/`    : Xcode demo project
pub struct ProjectFixture {
    /// Temporary directory used as the project root.
    pub root: tempfile::TempDir,
}

impl ProjectFixture {
    /// Create a root with both demo projects.
    pub fn new() -> Self {
        let fixture = Self {
            root: tempfile::tempdir().expect("create temp dir"),
        };
        fixture.write("platforms/android/build.gradle", BUILD_GRADLE);
        fixture.write("platforms/android/app/src/main/res/values/strings.xml", STRINGS_XML);
        fixture.write("platforms/android/app/src/main/res/xml/app_config.xml", APP_CONFIG_XML);
        fixture.write("platforms/ios/WeexDemo/WeexDemo-Info.plist", INFO_PLIST);
        fixture.write("platforms/ios/WeexDemo.xcodeproj/project.pbxproj", PROJECT_PBXPROJ);
        fixture
    }

    /// Path to the project root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `relative` under the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write fixture file");
    }

    /// Read `relative` back as text.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).expect("read fixture file")
    }

    /// Whether `relative` exists.
    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }
}

/// [`Log`] that keeps recorded files and stage headers in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    stages: Mutex<Vec<String>>,
    files: Mutex<Vec<FileEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> Vec<String> {
        self.stages.lock().unwrap().clone()
    }

    pub fn files(&self) -> Vec<FileEntry> {
        self.files.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<PatchStatus> {
        self.files().iter().map(|f| f.status).collect()
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.stages.lock().unwrap().push(msg.to_string());
    }
    fn info(&self, _msg: &str) {}
    fn debug(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
    fn dry_run(&self, _msg: &str) {}
    fn record_file(&self, name: &str, status: PatchStatus, message: Option<&str>) {
        self.files.lock().unwrap().push(FileEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }
}

/// [`Prompter`] answering from a fixed table; records each batch of names.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: ConfigValues,
    batches: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn answering(pairs: &[(&str, &str)]) -> Self {
        Self {
            answers: values(pairs),
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    async fn ask(&self, questions: &[Question]) -> Result<ConfigValues, ConfigError> {
        self.batches
            .lock()
            .unwrap()
            .push(questions.iter().map(|q| q.name.clone()).collect());
        Ok(questions
            .iter()
            .filter_map(|q| self.answers.get_key_value(&q.name))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
