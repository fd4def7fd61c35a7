//! Built-in text-rewrite strategies.
//!
//! Every strategy is a pure `(source, target, value) → text` function that
//! rewrites all matches and returns the input unchanged when nothing matches.
//! Literal targets are escaped and anchored on their surrounding delimiters
//! (`<key>…</key>`, `name="…"`), so `app_name` never touches `app_name_short`.
//! Values are inserted verbatim: no XML escaping and no `$1` expansion.
use std::borrow::Cow;
use std::fmt;

use regex::{Captures, Regex};

use crate::error::PatchError;

/// Plist key whose value names the bundled entry script.
pub const ENTRY_BUNDLE_KEY: &str = "WXEntryBundleURL";
/// Plist key whose value names the debug socket endpoint.
pub const SOCKET_CONNECTION_KEY: &str = "WXSocketConnectionURL";
/// Directory the entry bundle is copied into inside the app.
pub const BUNDLE_DIR: &str = "bundlejs";
/// Element name used by the XML strategies when a rule names none.
pub const DEFAULT_TAG: &str = "string";

/// What a strategy looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An exact name (plist key, XML `name` attribute), matched literally.
    Literal(String),
    /// Regular-expression source, used verbatim.
    Pattern(String),
}

impl Target {
    /// A literal name.
    #[must_use]
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    /// A regular-expression pattern.
    #[must_use]
    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern(source.into())
    }

    /// Regex fragment that matches this target.
    fn fragment(&self) -> Cow<'_, str> {
        match self {
            Self::Literal(name) => Cow::Owned(regex::escape(name)),
            Self::Pattern(source) => Cow::Borrowed(source),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(name) => write!(f, "{name}"),
            Self::Pattern(source) => write!(f, "/{source}/"),
        }
    }
}

/// The four built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Replace the `<string>` value of a property-list entry.
    Plist,
    /// Replace the text content of `<tag name="…">…</tag>`.
    XmlTag,
    /// Replace the `value` attribute of `<tag name="…" value="…"/>`.
    XmlAttr,
    /// Replace the text between the two capture groups of a pattern.
    Regex,
}

impl Strategy {
    /// Stable identifier used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plist => "plist-string-replace",
            Self::XmlTag => "xml-tag-text-replace",
            Self::XmlAttr => "xml-attribute-replace",
            Self::Regex => "regex-capture-replace",
        }
    }

    /// Run the strategy. `tag` is only read by the XML strategies.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::InvalidPattern`] if a pattern target does not compile.
    pub fn apply(
        self,
        source: &str,
        target: &Target,
        value: &str,
        tag: Option<&str>,
    ) -> Result<String, PatchError> {
        let tag = tag.unwrap_or(DEFAULT_TAG);
        match self {
            Self::Plist => plist(source, target, value),
            Self::XmlTag => xml_tag(source, target, value, tag),
            Self::XmlAttr => xml_attr(source, target, value, tag),
            Self::Regex => regex_capture(source, target, value),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle passed to custom rules so they can compose the built-ins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strategies;

impl Strategies {
    /// [`plist`] with a literal key.
    ///
    /// # Errors
    ///
    /// Never fails for literal keys; the signature matches the other strategies.
    pub fn plist(self, source: &str, key: &str, value: &str) -> Result<String, PatchError> {
        plist(source, &Target::literal(key), value)
    }

    /// [`xml_tag`] with a literal name.
    ///
    /// # Errors
    ///
    /// Never fails for literal names.
    pub fn xml_tag(
        self,
        source: &str,
        name: &str,
        value: &str,
        tag: &str,
    ) -> Result<String, PatchError> {
        xml_tag(source, &Target::literal(name), value, tag)
    }

    /// [`xml_attr`] with a literal name.
    ///
    /// # Errors
    ///
    /// Never fails for literal names.
    pub fn xml_attr(
        self,
        source: &str,
        name: &str,
        value: &str,
        tag: &str,
    ) -> Result<String, PatchError> {
        xml_attr(source, &Target::literal(name), value, tag)
    }

    /// [`regex_capture`] with a pattern source.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::InvalidPattern`] if `pattern` does not compile.
    pub fn regex(self, source: &str, pattern: &str, value: &str) -> Result<String, PatchError> {
        regex_capture(source, &Target::pattern(pattern), value)
    }
}

fn compile(pattern: &str) -> Result<Regex, PatchError> {
    Regex::new(pattern).map_err(|source| PatchError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Whether a plist key is guaranteed to exist after patching.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    key == ENTRY_BUNDLE_KEY || key == SOCKET_CONNECTION_KEY
}

/// Join an entry script name onto [`BUNDLE_DIR`].
#[must_use]
pub fn bundle_path(value: &str) -> String {
    let relative = value.trim_start_matches("./").trim_start_matches('/');
    format!("{BUNDLE_DIR}/{relative}")
}

/// Replace the `<string>` value following `<key>TARGET</key>`.
///
/// Both `<string>…</string>` and the empty `<string/>` form are rewritten to
/// `<string>VALUE</string>`. Reserved keys ([`ENTRY_BUNDLE_KEY`],
/// [`SOCKET_CONNECTION_KEY`]) are inserted before the closing
/// `</dict></plist>` only when the file has no `<key>` entry for them at all.
/// The entry bundle value is joined onto [`BUNDLE_DIR`] first.
///
/// # Errors
///
/// Returns [`PatchError::InvalidPattern`] if a pattern target does not compile.
pub fn plist(source: &str, target: &Target, value: &str) -> Result<String, PatchError> {
    let key_element = format!("<key>(?:{})</key>", target.fragment());
    let entry = compile(&format!(
        r"(?P<head>{key_element}\s*)(?:<string>[^<>]*?</string>|<string\s*/>)"
    ))?;

    match target {
        Target::Literal(key) if is_reserved_key(key) => {
            let value = if key == ENTRY_BUNDLE_KEY {
                bundle_path(value)
            } else {
                value.to_string()
            };
            if compile(&key_element)?.is_match(source) {
                Ok(replace_entry(&entry, source, &value))
            } else {
                insert_entry(source, key, &value)
            }
        }
        _ => Ok(replace_entry(&entry, source, value)),
    }
}

fn replace_entry(entry: &Regex, source: &str, value: &str) -> String {
    entry
        .replace_all(source, |caps: &Captures<'_>| {
            format!("{}<string>{value}</string>", &caps["head"])
        })
        .into_owned()
}

fn insert_entry(source: &str, key: &str, value: &str) -> Result<String, PatchError> {
    let tail = compile(r"(?i)</dict>\s*</plist>\s*$")?;
    Ok(tail.find(source).map_or_else(
        || source.to_string(),
        |m| {
            let (body, rest) = source.split_at(m.start());
            format!("{body}  <key>{key}</key>\n  <string>{value}</string>\n{rest}")
        },
    ))
}

/// Replace the text content of `<TAG name="TARGET">…</TAG>`.
///
/// The opening tag, including any further attributes, is kept as is. Only
/// text without nested elements is matched.
///
/// # Errors
///
/// Returns [`PatchError::InvalidPattern`] if a pattern target does not compile.
pub fn xml_tag(
    source: &str,
    target: &Target,
    value: &str,
    tag: &str,
) -> Result<String, PatchError> {
    let tag = regex::escape(tag);
    let element = compile(&format!(
        r#"(?P<open><{tag}\s+name="(?:{})"(?:\s+[^>]*[^>/])?\s*>)[^<]*(?P<close></{tag}>)"#,
        target.fragment()
    ))?;
    Ok(element
        .replace_all(source, |caps: &Captures<'_>| {
            format!("{}{value}{}", &caps["open"], &caps["close"])
        })
        .into_owned())
}

/// Replace the `value` attribute of a self-closing `<TAG name="TARGET" value="…"/>`.
///
/// # Errors
///
/// Returns [`PatchError::InvalidPattern`] if a pattern target does not compile.
pub fn xml_attr(
    source: &str,
    target: &Target,
    value: &str,
    tag: &str,
) -> Result<String, PatchError> {
    let tag = regex::escape(tag);
    let element = compile(&format!(
        r#"(?P<head><{tag}\s+name="(?:{})"\s+value=")[^"]*(?P<tail>"\s*/>)"#,
        target.fragment()
    ))?;
    Ok(element
        .replace_all(source, |caps: &Captures<'_>| {
            format!("{}{value}{}", &caps["head"], &caps["tail"])
        })
        .into_owned())
}

/// Replace every match of `pattern` with `prefix + value + suffix`, where
/// prefix and suffix are capture groups 1 and 2 (either may be absent).
///
/// # Errors
///
/// Returns [`PatchError::InvalidPattern`] if the pattern does not compile.
pub fn regex_capture(source: &str, pattern: &Target, value: &str) -> Result<String, PatchError> {
    let re = compile(&pattern.fragment())?;
    Ok(re
        .replace_all(source, |caps: &Captures<'_>| {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let suffix = caps.get(2).map_or("", |m| m.as_str());
            format!("{prefix}{value}{suffix}")
        })
        .into_owned())
}
