//! Property descriptors that drive prompting for missing values.
use std::collections::HashSet;

use crate::patch::PatchSchema;

/// A configuration key and the question asked when it has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Configuration key.
    pub name: String,
    /// Prompt shown to the user.
    pub description: String,
}

impl PropertyDescriptor {
    /// A descriptor; an absent or empty description becomes `enter your <name>:`.
    #[must_use]
    pub fn new(name: &str, description: Option<&str>) -> Self {
        let description = description
            .filter(|d| !d.is_empty())
            .map_or_else(|| format!("enter your {name}:"), String::from);
        Self {
            name: name.to_string(),
            description,
        }
    }
}

/// Every key of `schema`, in declaration order, deduplicated by name.
///
/// The first description declared for a key wins.
#[must_use]
pub fn from_schema(schema: &PatchSchema) -> Vec<PropertyDescriptor> {
    let mut seen = HashSet::new();
    schema
        .keys()
        .filter(|key| seen.insert(key.name.as_str()))
        .map(|key| PropertyDescriptor::new(&key.name, key.description.as_deref()))
        .collect()
}

/// Parse `name` / `name|description` tokens separated by commas.
///
/// Tokens are trimmed; empty tokens and repeated names are skipped.
///
/// # Examples
///
/// ```
/// use platform_config_cli::config::properties::from_spec;
///
/// let props = from_spec("AppName|Display name, AppId");
/// assert_eq!(props[0].description, "Display name");
/// assert_eq!(props[1].description, "enter your AppId:");
/// ```
#[must_use]
pub fn from_spec(spec: &str) -> Vec<PropertyDescriptor> {
    let mut seen = HashSet::new();
    spec.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let (name, description) = token
                .split_once('|')
                .map_or((token, None), |(n, d)| (n.trim(), Some(d.trim())));
            (!name.is_empty() && seen.insert(name.to_string()))
                .then(|| PropertyDescriptor::new(name, description))
        })
        .collect()
}
