//! Declarative patch schema: file → key → rules.
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::strategy::{Strategies, Strategy, Target};
use crate::config::ConfigValues;
use crate::error::PatchError;

/// Signature of a custom rule: current text, the key's value (if any), and
/// the built-in strategies to compose.
pub type Handler =
    dyn Fn(&str, Option<&str>, &Strategies) -> Result<String, PatchError> + Send + Sync;

/// A typed rule: one built-in strategy applied to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedRule {
    /// Strategy to run.
    pub strategy: Strategy,
    /// Plist key, XML `name`, or pattern.
    pub target: Target,
    /// XML element kind; `None` means [`DEFAULT_TAG`](super::strategy::DEFAULT_TAG).
    pub tag: Option<String>,
}

/// One instruction to locate and replace a text region for a key.
#[derive(Clone)]
pub enum PatchRule {
    /// Delegates to a built-in strategy; the key must have a value.
    Typed(TypedRule),
    /// Arbitrary logic; receives the value even when absent.
    Custom(Arc<Handler>),
}

impl PatchRule {
    fn typed(strategy: Strategy, target: Target, tag: Option<&str>) -> Self {
        Self::Typed(TypedRule {
            strategy,
            target,
            tag: tag.map(String::from),
        })
    }

    /// Replace the string value of plist key `key`.
    #[must_use]
    pub fn plist(key: &str) -> Self {
        Self::typed(Strategy::Plist, Target::literal(key), None)
    }

    /// Replace the string value of every plist key matching `pattern`.
    #[must_use]
    pub fn plist_pattern(pattern: &str) -> Self {
        Self::typed(Strategy::Plist, Target::pattern(pattern), None)
    }

    /// Replace the text of `<string name="name">`.
    #[must_use]
    pub fn xml_tag(name: &str) -> Self {
        Self::typed(Strategy::XmlTag, Target::literal(name), None)
    }

    /// Replace the text of `<tag name="name">`.
    #[must_use]
    pub fn xml_tag_in(name: &str, tag: &str) -> Self {
        Self::typed(Strategy::XmlTag, Target::literal(name), Some(tag))
    }

    /// Replace the `value` attribute of `<string name="name" value="…"/>`.
    #[must_use]
    pub fn xml_attr(name: &str) -> Self {
        Self::typed(Strategy::XmlAttr, Target::literal(name), None)
    }

    /// Replace the `value` attribute of `<tag name="name" value="…"/>`.
    #[must_use]
    pub fn xml_attr_in(name: &str, tag: &str) -> Self {
        Self::typed(Strategy::XmlAttr, Target::literal(name), Some(tag))
    }

    /// Replace the text between the two capture groups of `pattern`.
    #[must_use]
    pub fn regex(pattern: &str) -> Self {
        Self::typed(Strategy::Regex, Target::pattern(pattern), None)
    }

    /// A rule backed by a closure.
    #[must_use]
    pub fn custom<F>(handler: F) -> Self
    where
        F: Fn(&str, Option<&str>, &Strategies) -> Result<String, PatchError>
            + Send
            + Sync
            + 'static,
    {
        Self::Custom(Arc::new(handler))
    }

    /// Apply this rule for `key` to `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::MissingValue`] if this is a typed rule and `key`
    /// has no value, or whatever the strategy or custom handler returns.
    pub fn apply(
        &self,
        source: &str,
        key: &str,
        values: &ConfigValues,
    ) -> Result<String, PatchError> {
        match self {
            Self::Typed(rule) => {
                let value = values
                    .get(key)
                    .ok_or_else(|| PatchError::MissingValue(key.to_string()))?;
                rule.strategy
                    .apply(source, &rule.target, value, rule.tag.as_deref())
            }
            Self::Custom(handler) => {
                handler(source, values.get(key).map(String::as_str), &Strategies)
            }
        }
    }
}

impl fmt::Debug for PatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(rule) => f.debug_tuple("Typed").field(rule).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// The ordered rules declared for one configuration key in one file.
#[derive(Debug, Clone)]
pub struct KeyRules {
    /// Configuration key the rules read.
    pub name: String,
    /// Prompt text used when the key has no value.
    pub description: Option<String>,
    /// Rules applied left to right, each consuming the previous output.
    pub rules: Vec<PatchRule>,
}

impl KeyRules {
    /// Rules for `name` with no description.
    #[must_use]
    pub fn new(name: &str, rules: Vec<PatchRule>) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            rules,
        }
    }

    /// Attach a prompt description.
    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Thread `text` through every rule.
    ///
    /// # Errors
    ///
    /// Propagates the first rule failure.
    pub fn apply(&self, text: String, values: &ConfigValues) -> Result<String, PatchError> {
        self.rules
            .iter()
            .try_fold(text, |text, rule| rule.apply(&text, &self.name, values))
    }
}

/// All keys patched in one file.
#[derive(Debug, Clone)]
pub struct FilePatch {
    /// Path relative to the project directory.
    pub path: PathBuf,
    /// Keys in declaration order.
    pub keys: Vec<KeyRules>,
}

impl FilePatch {
    /// An empty patch for `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            keys: Vec::new(),
        }
    }

    /// Add a key with a single rule.
    #[must_use]
    pub fn key(self, name: &str, rule: PatchRule) -> Self {
        self.entry(KeyRules::new(name, vec![rule]))
    }

    /// Add a key with an ordered list of rules.
    #[must_use]
    pub fn rules(self, name: &str, rules: Vec<PatchRule>) -> Self {
        self.entry(KeyRules::new(name, rules))
    }

    /// Add a fully built key entry.
    #[must_use]
    pub fn entry(mut self, key: KeyRules) -> Self {
        self.keys.push(key);
        self
    }

    /// Apply every key to `source` in declaration order.
    ///
    /// # Errors
    ///
    /// Propagates the first rule failure; no partial text is returned.
    pub fn patch_text(&self, source: &str, values: &ConfigValues) -> Result<String, PatchError> {
        self.keys
            .iter()
            .try_fold(source.to_string(), |text, key| key.apply(text, values))
    }
}

/// The full file → key → rule declaration for one platform.
#[derive(Debug, Clone, Default)]
pub struct PatchSchema {
    files: Vec<FilePatch>,
}

impl PatchSchema {
    /// A schema over `files`, applied in the given order.
    #[must_use]
    pub const fn new(files: Vec<FilePatch>) -> Self {
        Self { files }
    }

    /// Files in declaration order.
    #[must_use]
    pub fn files(&self) -> &[FilePatch] {
        &self.files
    }

    /// Every key of every file, in declaration order, duplicates included.
    pub fn keys(&self) -> impl Iterator<Item = &KeyRules> {
        self.files.iter().flat_map(|f| f.keys.iter())
    }
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

    fn values(pairs: &[(&str, &str)]) -> ConfigValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn typed_rule_requires_value() {
        let rule = PatchRule::xml_tag("app_name");
        let err = rule.apply("<x/>", "AppName", &values(&[])).unwrap_err();
        assert!(matches!(err, PatchError::MissingValue(ref k) if k == "AppName"));
    }

    #[test]
    fn custom_rule_receives_absent_value() {
        let rule = PatchRule::custom(|source, value, _| {
            Ok(format!("{source}|{}", value.unwrap_or("<none>")))
        });
        assert_eq!(rule.apply("text", "Ws", &values(&[])).unwrap(), "text|<none>");
        assert_eq!(
            rule.apply("text", "Ws", &values(&[("Ws", "ws://x")])).unwrap(),
            "text|ws://x"
        );
    }

    #[test]
    fn key_rules_thread_text_left_to_right() {
        let key = KeyRules::new(
            "V",
            vec![
                PatchRule::custom(|s, _, _| Ok(format!("{s}a"))),
                PatchRule::custom(|s, _, _| Ok(format!("{s}b"))),
                PatchRule::regex("(x)(a)"),
            ],
        );
        let out = key.apply("x".to_string(), &values(&[("V", "-")])).unwrap();
        assert_eq!(out, "x-ab");
    }

    #[test]
    fn file_patch_applies_keys_in_declaration_order() {
        let file = FilePatch::new("f.txt")
            .key("First", PatchRule::regex("(<)[^>]*(>)"))
            .key("Second", PatchRule::custom(|s, v, _| Ok(s.replace("one", v.unwrap_or("")))));
        let out = file
            .patch_text("<old>", &values(&[("First", "one"), ("Second", "two")]))
            .unwrap();
        assert_eq!(out, "<two>");
    }

    #[test]
    fn schema_keys_flatten_across_files() {
        let schema = PatchSchema::new(vec![
            FilePatch::new("a").key("A", PatchRule::plist("K")),
            FilePatch::new("b")
                .key("B", PatchRule::plist("K"))
                .key("A", PatchRule::plist("L")),
        ]);
        let names: Vec<&str> = schema.keys().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "A"]);
    }

    #[test]
    fn rule_debug_hides_handler() {
        let rule = PatchRule::custom(|s, _, _| Ok(s.to_string()));
        assert_eq!(format!("{rule:?}"), "Custom(..)");
        assert!(format!("{:?}", PatchRule::plist("K")).starts_with("Typed("));
    }

    #[test]
    fn builder_sets_tag_and_description() {
        let key = KeyRules::new("AppName", vec![PatchRule::xml_attr_in("n", "preference")])
            .describe("Application name");
        assert_eq!(key.description.as_deref(), Some("Application name"));
        let PatchRule::Typed(rule) = &key.rules[0] else {
            panic!("expected a typed rule");
        };
        assert_eq!(rule.tag.as_deref(), Some("preference"));
        assert_eq!(rule.strategy, Strategy::XmlAttr);
    }
}
