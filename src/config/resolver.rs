//! Builds the value mapping for one resolution pass.
use std::path::{Path, PathBuf};

use super::ConfigValues;
use super::properties::{self, PropertyDescriptor};
use super::store;
use crate::error::ConfigError;
use crate::fs::FileSystem;
use crate::logging::Log;
use crate::patch::PatchSchema;
use crate::prompt::{Prompter, Question};

/// Merges defaults, persisted values and overrides, and prompts for the rest.
#[derive(Debug, Clone)]
pub struct ConfigurationResolver {
    properties: Vec<PropertyDescriptor>,
    root: PathBuf,
    platform: String,
}

impl ConfigurationResolver {
    /// A resolver for `platform` that requires `properties`, with its
    /// configuration files under `root`.
    #[must_use]
    pub fn new(
        properties: Vec<PropertyDescriptor>,
        root: impl AsRef<Path>,
        platform: &str,
    ) -> Self {
        Self {
            properties,
            root: root.as_ref().to_path_buf(),
            platform: platform.to_string(),
        }
    }

    /// Require every key declared by `schema`.
    #[must_use]
    pub fn from_schema(schema: &PatchSchema, root: impl AsRef<Path>, platform: &str) -> Self {
        Self::new(properties::from_schema(schema), root, platform)
    }

    /// Require the keys listed in a `name|description,...` string.
    #[must_use]
    pub fn from_spec(spec: &str, root: impl AsRef<Path>, platform: &str) -> Self {
        Self::new(properties::from_spec(spec), root, platform)
    }

    /// Required properties in prompt order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Location of the persisted per-platform file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        store::platform_config_path(&self.root, &self.platform)
    }

    /// Produce the complete mapping for this platform.
    ///
    /// Missing properties are asked in a single [`Prompter::ask`] call; when
    /// anything was asked, the whole merged mapping is written to
    /// [`config_path`](Self::config_path). `overrides` is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for a malformed configuration file,
    /// [`ConfigError::Prompt`] if prompting fails, and [`ConfigError::Fs`] if
    /// the mapping cannot be persisted.
    pub async fn get_configuration<P: Prompter>(
        &self,
        overrides: &ConfigValues,
        fs: &dyn FileSystem,
        prompter: &P,
        log: &dyn Log,
    ) -> Result<ConfigValues, ConfigError> {
        log.stage(&format!("Build {} configuration", self.platform));

        let defaults = store::load_defaults(fs, &self.root, &self.platform)?;
        let persisted = store::load_platform(fs, &self.root, &self.platform)?;
        log.debug(&format!(
            "{} default(s), {} persisted, {} override(s)",
            defaults.len(),
            persisted.len(),
            overrides.len()
        ));
        let mut values = merge(overrides, &defaults, &persisted);

        let mut questions = Vec::new();
        for property in &self.properties {
            match values.get(&property.name) {
                Some(value) => log.info(&format!("{:<12} : {value}", property.name)),
                None => questions.push(Question::new(&property.name, &property.description)),
            }
        }

        if questions.is_empty() {
            log.info(&format!(
                "all values present; edit {} to change them",
                self.config_path().display()
            ));
            return Ok(values);
        }

        log.debug(&format!("asking for {} missing value(s)", questions.len()));
        let answers = prompter.ask(&questions).await?;
        values.extend(answers);

        let path = store::save_platform(fs, &self.root, &self.platform, &values)?;
        log.info(&format!("saved configuration to {}", path.display()));
        Ok(values)
    }
}

/// Combine the three sources into a new mapping.
///
/// On conflicting keys `persisted` beats `defaults`, which beats `overrides`.
#[must_use]
pub fn merge(
    overrides: &ConfigValues,
    defaults: &ConfigValues,
    persisted: &ConfigValues,
) -> ConfigValues {
    overrides
        .iter()
        .chain(defaults)
        .chain(persisted)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::fs::test_helpers::MemoryFileSystem;
    use crate::logging::test_helpers::RecordingLog;

    fn values(pairs: &[(&str, &str)]) -> ConfigValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    /// Answers from a fixed table and records every batch it was asked.
    #[derive(Debug, Default)]
    struct ScriptedPrompter {
        answers: ConfigValues,
        batches: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedPrompter {
        fn answering(pairs: &[(&str, &str)]) -> Self {
            Self {
                answers: values(pairs),
                ..Self::default()
            }
        }

        fn batches(&self) -> Vec<Vec<String>> {
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

    struct FailingPrompter;

    impl Prompter for FailingPrompter {
        async fn ask(&self, _: &[Question]) -> Result<ConfigValues, ConfigError> {
            Err(ConfigError::Prompt("interrupted".to_string()))
        }
    }

    #[test]
    fn merge_precedence_platform_over_defaults_over_overrides() {
        let merged = merge(
            &values(&[("C", "4")]),
            &values(&[("A", "1")]),
            &values(&[("A", "2"), ("B", "3")]),
        );
        assert_eq!(merged, values(&[("A", "2"), ("B", "3"), ("C", "4")]));
    }

    #[test]
    fn merge_defaults_beat_overrides() {
        let merged = merge(&values(&[("A", "cli")]), &values(&[("A", "default")]), &values(&[]));
        assert_eq!(merged["A"], "default");
    }

    #[tokio::test]
    async fn missing_values_are_asked_in_one_batch_and_persisted() {
        let fs = MemoryFileSystem::new().with_file("/r/ios.config.json", r#"{ "A": "1" }"#);
        let log = RecordingLog::new();
        let prompter = ScriptedPrompter::answering(&[("B", "2"), ("C", "3")]);
        let resolver = ConfigurationResolver::from_spec("A,B|bee,C", "/r", "ios");

        let resolved = resolver
            .get_configuration(&values(&[]), &fs, &prompter, &log)
            .await
            .unwrap();

        assert_eq!(resolved, values(&[("A", "1"), ("B", "2"), ("C", "3")]));
        assert_eq!(prompter.batches(), vec![vec!["B".to_string(), "C".to_string()]]);
        let saved: ConfigValues =
            serde_json::from_str(&fs.content("/r/ios.config.json").unwrap()).unwrap();
        assert_eq!(saved, resolved);
    }

    #[tokio::test]
    async fn complete_values_skip_prompt_and_write() {
        let fs = MemoryFileSystem::new()
            .with_file("/r/.wx/config.json", r#"{ "android": { "A": "1" } }"#);
        let log = RecordingLog::new();
        let prompter = ScriptedPrompter::default();
        let resolver = ConfigurationResolver::from_spec("A,B", "/r", "android");

        let resolved = resolver
            .get_configuration(&values(&[("B", "cli")]), &fs, &prompter, &log)
            .await
            .unwrap();

        assert_eq!(resolved, values(&[("A", "1"), ("B", "cli")]));
        assert!(prompter.batches().is_empty());
        assert!(fs.writes().is_empty());
        assert!(log.lines().contains(&"info: A            : 1".to_string()));
    }

    #[tokio::test]
    async fn overrides_are_persisted_and_left_untouched() {
        let fs = MemoryFileSystem::new();
        let log = RecordingLog::new();
        let prompter = ScriptedPrompter::answering(&[("A", "asked")]);
        let resolver = ConfigurationResolver::from_spec("A", "/r", "ios");
        let overrides = values(&[("Extra", "runtime")]);

        let resolved = resolver
            .get_configuration(&overrides, &fs, &prompter, &log)
            .await
            .unwrap();

        assert_eq!(overrides, values(&[("Extra", "runtime")]));
        assert_eq!(resolved, values(&[("A", "asked"), ("Extra", "runtime")]));
        assert!(fs.content("/r/ios.config.json").unwrap().contains("\"Extra\": \"runtime\""));
    }

    #[tokio::test]
    async fn malformed_platform_file_aborts_before_prompting() {
        let fs = MemoryFileSystem::new().with_file("/r/ios.config.json", "{");
        let log = RecordingLog::new();
        let prompter = ScriptedPrompter::default();
        let resolver = ConfigurationResolver::from_spec("A", "/r", "ios");

        let err = resolver
            .get_configuration(&values(&[]), &fs, &prompter, &log)
            .await
            .unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
        assert!(prompter.batches().is_empty());
    }

    #[tokio::test]
    async fn prompt_failure_writes_nothing() {
        let fs = MemoryFileSystem::new();
        let log = RecordingLog::new();
        let resolver = ConfigurationResolver::from_spec("A", "/r", "ios");

        let err = resolver
            .get_configuration(&values(&[]), &fs, &FailingPrompter, &log)
            .await
            .unwrap_err();

        assert!(matches!(err, ConfigError::Prompt(_)), "got {err:?}");
        assert!(fs.writes().is_empty());
    }

    #[test]
    fn schema_resolver_lists_schema_keys() {
        let resolver =
            ConfigurationResolver::from_schema(&crate::patch::builtin::android(), "/r", "android");
        let names: Vec<&str> = resolver.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["AppId", "AppName", "SplashText", "WeexBundle"]);
        assert_eq!(resolver.config_path(), PathBuf::from("/r/android.config.json"));
    }
}
