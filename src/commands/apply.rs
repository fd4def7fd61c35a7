//! Command: resolve configuration and patch a native project.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::resolve_root;
use crate::cli::{ApplyOpts, GlobalOpts};
use crate::config::{ConfigValues, ConfigurationResolver};
use crate::error::Error;
use crate::fs::{FileSystem, OsFileSystem};
use crate::logging::{Log, Logger};
use crate::patch::{FileOutcome, PatchContext};
use crate::platform::Platform;
use crate::prompt::{Prompter, StdinPrompter};

/// One resolution pass: where to read configuration, which project to
/// patch, and with which up-front values.
#[derive(Debug, Clone)]
pub struct ApplyPlan {
    /// Target platform; selects the schema.
    pub platform: Platform,
    /// Directory holding `<platform>.config.json` and `.wx/config.json`.
    pub root: PathBuf,
    /// Native project directory the schema paths are relative to.
    pub project: PathBuf,
    /// Values passed on the command line.
    pub overrides: ConfigValues,
    /// Property list replacing the schema-derived one.
    pub properties: Option<String>,
    /// Report patches without writing project files.
    pub dry_run: bool,
}

impl ApplyPlan {
    /// A plan for `platform` under `root`, patching `<root>/platforms/<platform>`.
    #[must_use]
    pub fn new(platform: Platform, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            project: root.join("platforms").join(platform.name()),
            platform,
            root,
            overrides: ConfigValues::new(),
            properties: None,
            dry_run: false,
        }
    }

    /// Build the plan from parsed command-line options.
    ///
    /// # Errors
    ///
    /// Returns an error if the project root cannot be determined.
    pub fn from_opts(global: &GlobalOpts, opts: &ApplyOpts) -> Result<Self> {
        let mut plan = Self::new(opts.platform, resolve_root(global)?);
        if let Some(project) = &opts.project {
            plan.project.clone_from(project);
        }
        plan.overrides = opts.set.iter().cloned().collect();
        plan.properties.clone_from(&opts.properties);
        plan.dry_run = global.dry_run;
        Ok(plan)
    }

    /// The resolver for this plan's properties.
    #[must_use]
    pub fn resolver(&self) -> ConfigurationResolver {
        let platform = self.platform.name();
        match &self.properties {
            Some(spec) => ConfigurationResolver::from_spec(spec, &self.root, platform),
            None => {
                ConfigurationResolver::from_schema(&self.platform.schema(), &self.root, platform)
            }
        }
    }

    /// Resolve values, then patch every schema file under
    /// [`project`](Self::project).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if configuration cannot be resolved (nothing
    /// is patched) and [`Error::Patch`] if patching stops part-way.
    pub async fn execute<P: Prompter>(
        &self,
        fs: &dyn FileSystem,
        prompter: &P,
        log: &dyn Log,
    ) -> Result<Vec<FileOutcome>, Error> {
        let values = self
            .resolver()
            .get_configuration(&self.overrides, fs, prompter, log)
            .await?;

        log.stage(&format!("Patch {} project", self.platform));
        log.debug(&format!("project directory: {}", self.project.display()));
        if self.dry_run {
            log.dry_run("project files will not be written");
        }
        let ctx = PatchContext {
            fs,
            log,
            dry_run: self.dry_run,
        };
        Ok(self.platform.schema().resolve(&values, &self.project, &ctx)?)
    }
}

/// Run the apply command.
///
/// # Errors
///
/// Returns an error if configuration resolution or any file patch fails.
pub fn run(global: &GlobalOpts, opts: &ApplyOpts, log: &Logger) -> Result<()> {
    let plan = ApplyPlan::from_opts(global, opts)?;
    log.info(&format!("platform-config {}", super::version::version()));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("starting async runtime")?;
    let result = runtime.block_on(plan.execute(&OsFileSystem, &StdinPrompter, log));

    log.print_summary();

    let outcomes = result?;
    let changed = outcomes.iter().filter(|o| o.changed).count();
    if plan.dry_run {
        log.dry_run(&format!("{changed} of {} file(s) would change", outcomes.len()));
    } else {
        log.info(&format!("{changed} of {} file(s) changed", outcomes.len()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::fs::test_helpers::MemoryFileSystem;
    use crate::logging::test_helpers::RecordingLog;
    use crate::prompt::Question;

    struct NoPrompt;

    impl Prompter for NoPrompt {
        async fn ask(
            &self,
            questions: &[Question],
        ) -> Result<ConfigValues, crate::error::ConfigError> {
            panic!("unexpected prompt for {questions:?}");
        }
    }

    #[test]
    fn plan_defaults_project_under_root() {
        let plan = ApplyPlan::new(Platform::Android, "/r");
        assert_eq!(plan.project, PathBuf::from("/r/platforms/android"));
        assert!(!plan.dry_run);
    }

    #[test]
    fn plan_from_opts_collects_overrides() {
        let global = GlobalOpts {
            dry_run: true,
            root: Some(PathBuf::from("/r")),
        };
        let opts = ApplyOpts {
            platform: Platform::Ios,
            project: Some(PathBuf::from("/elsewhere")),
            set: vec![("AppId".to_string(), "com.x".to_string())],
            properties: Some("AppId".to_string()),
        };
        let plan = ApplyPlan::from_opts(&global, &opts).unwrap();
        assert_eq!(plan.project, PathBuf::from("/elsewhere"));
        assert_eq!(plan.overrides["AppId"], "com.x");
        assert!(plan.dry_run);
        assert_eq!(plan.resolver().properties().len(), 1);
    }

    #[tokio::test]
    async fn execute_patches_with_supplied_values() {
        let fs = MemoryFileSystem::new()
            .with_file("/r/platforms/android/build.gradle", "applicationId \"com.old\"\n")
            .with_file(
                "/r/platforms/android/app/src/main/res/values/strings.xml",
                "<string name=\"app_name\">Old</string>\n<string name=\"dummy_content\">Hi</string>\n",
            )
            .with_file(
                "/r/platforms/android/app/src/main/res/xml/app_config.xml",
                "<preference name=\"launch_locally\" value=\"false\" />\n<preference name=\"local_url\" value=\"\" />\n",
            );
        let log = RecordingLog::new();
        let mut plan = ApplyPlan::new(Platform::Android, "/r");
        plan.overrides = [
            ("AppId", "com.new"),
            ("AppName", "New"),
            ("SplashText", "Hello"),
            ("WeexBundle", "index.vue"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let outcomes = plan.execute(&fs, &NoPrompt, &log).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.changed && o.written));
        assert_eq!(
            fs.content("/r/platforms/android/build.gradle").unwrap(),
            "applicationId \"com.new\"\n"
        );
        assert!(
            fs.content("/r/platforms/android/app/src/main/res/xml/app_config.xml")
                .unwrap()
                .contains("value=\"file://assets/dist/index.js\"")
        );
        assert!(log.lines().contains(&"stage: Patch android project".to_string()));
    }

    #[tokio::test]
    async fn execute_stops_before_patching_on_config_error() {
        let fs = MemoryFileSystem::new().with_file("/r/ios.config.json", "not json");
        let log = RecordingLog::new();
        let plan = ApplyPlan::new(Platform::Ios, "/r");

        let err = plan.execute(&fs, &NoPrompt, &log).await.unwrap_err();

        assert!(matches!(err, Error::Config(_)), "got {err:?}");
        assert!(fs.writes().is_empty());
        assert!(log.files().is_empty());
    }
}
