//! Configuration values: where they come from and how they are persisted.
pub mod properties;
pub mod resolver;
pub mod store;

use std::collections::BTreeMap;

pub use properties::PropertyDescriptor;
pub use resolver::{ConfigurationResolver, merge};

/// Flat `key → value` mapping handed to the patch engine.
pub type ConfigValues = BTreeMap<String, String>;
