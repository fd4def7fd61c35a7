//! Patch schemas for the bundled iOS and Android demo projects.
use super::schema::{FilePatch, KeyRules, PatchRule, PatchSchema};
use super::strategy::{Strategies, ENTRY_BUNDLE_KEY, SOCKET_CONNECTION_KEY};
use crate::error::PatchError;

/// Configuration key holding the entry script (local name or remote URL).
pub const WEEX_BUNDLE: &str = "WeexBundle";

const PREFERENCE_TAG: &str = "preference";
const LOCAL_BUNDLE_PREFIX: &str = "file://assets/dist/";

/// Schema for the Android Gradle project.
#[must_use]
pub fn android() -> PatchSchema {
    PatchSchema::new(vec![
        FilePatch::new("build.gradle").entry(
            KeyRules::new("AppId", vec![PatchRule::regex(r#"(applicationId ")[^"]*(")"#)])
                .describe("enter your application id (e.g. com.example.app):"),
        ),
        FilePatch::new("app/src/main/res/values/strings.xml")
            .entry(
                KeyRules::new("AppName", vec![PatchRule::xml_tag("app_name")])
                    .describe("enter your app name:"),
            )
            .key("SplashText", PatchRule::xml_tag("dummy_content")),
        FilePatch::new("app/src/main/res/xml/app_config.xml").entry(
            KeyRules::new(WEEX_BUNDLE, vec![PatchRule::custom(launch_preferences)])
                .describe("enter your entry bundle (file name or http(s) url):"),
        ),
    ])
}

/// Schema for the Xcode project.
#[must_use]
pub fn ios() -> PatchSchema {
    PatchSchema::new(vec![
        FilePatch::new("WeexDemo/WeexDemo-Info.plist")
            .entry(
                KeyRules::new("AppName", vec![PatchRule::plist("CFBundleDisplayName")])
                    .describe("enter your app name:"),
            )
            .key("Version", PatchRule::plist("CFBundleShortVersionString"))
            .key("BuildVersion", PatchRule::plist("CFBundleVersion"))
            .entry(
                KeyRules::new("AppId", vec![PatchRule::plist("CFBundleIdentifier")])
                    .describe("enter your bundle identifier (e.g. com.example.app):"),
            )
            .entry(
                KeyRules::new(WEEX_BUNDLE, vec![PatchRule::plist(ENTRY_BUNDLE_KEY)])
                    .describe("enter your entry bundle (file name or http(s) url):"),
            )
            .key("Ws", PatchRule::plist(SOCKET_CONNECTION_KEY)),
        FilePatch::new("WeexDemo.xcodeproj/project.pbxproj")
            .rules(
                "CodeSign",
                vec![
                    PatchRule::regex(
                        r#"("?CODE_SIGN_IDENTITY(?:\[sdk=iphoneos\*\])?"?\s*=\s*").*?(")"#,
                    ),
                    PatchRule::plist_pattern(r"CODE_SIGN_IDENTITY(\[sdk=iphoneos\*\])?"),
                ],
            )
            .rules(
                "Profile",
                vec![
                    PatchRule::regex(r#"(PROVISIONING_PROFILE\s*=\s*")[^"]*?(")"#),
                    PatchRule::plist("PROVISIONING_PROFILE"),
                ],
            ),
    ])
}

/// Point the Android shell at a remote URL or at a bundled script.
fn launch_preferences(
    source: &str,
    value: Option<&str>,
    strategies: &Strategies,
) -> Result<String, PatchError> {
    let value = value.ok_or_else(|| PatchError::MissingValue(WEEX_BUNDLE.to_string()))?;
    if is_remote(value) {
        let text = strategies.xml_attr(source, "launch_locally", "false", PREFERENCE_TAG)?;
        strategies.xml_attr(&text, "launch_url", value, PREFERENCE_TAG)
    } else {
        let text = strategies.xml_attr(source, "launch_locally", "true", PREFERENCE_TAG)?;
        let local = format!("{LOCAL_BUNDLE_PREFIX}{}", compiled_name(value));
        strategies.xml_attr(&text, "local_url", &local, PREFERENCE_TAG)
    }
}

fn is_remote(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// `index.we` / `index.vue` → `index.js`; anything else is kept.
fn compiled_name(value: &str) -> String {
    [".we", ".vue"]
        .iter()
        .find_map(|ext| value.strip_suffix(ext))
        .map_or_else(|| value.to_string(), |stem| format!("{stem}.js"))
}
