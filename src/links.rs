use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LinkError, Result};

/// A symlink configuration value exactly as the user wrote it.
///
/// Accepted shapes:
/// - nothing at all (`Absent`)
/// - a single logical name that links to itself: `"widget.js"`
/// - a table of logical name to public name: `{ "widget.js" = "v1/widget.js" }`
/// - a list of any of the above, nested to any depth
///
/// Anything else is kept as `Other` so normalization can report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Absent,
    Name(String),
    List(Vec<ConfigValue>),
    Mapping(Vec<(String, String)>),
    Other(String),
}

impl ConfigValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, ConfigValue::Absent)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Absent => write!(f, "nothing"),
            ConfigValue::Name(name) => write!(f, "{name:?}"),
            ConfigValue::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ConfigValue::Mapping(pairs) => {
                write!(f, "{{")?;
                for (idx, (from, to)) in pairs.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{from:?} = {to:?}")?;
                }
                write!(f, "}}")
            }
            ConfigValue::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl From<toml::Value> for ConfigValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(name) => ConfigValue::Name(name),
            toml::Value::Array(items) => {
                ConfigValue::List(items.into_iter().map(ConfigValue::from).collect())
            }
            toml::Value::Table(table) => {
                let rendered = toml::Value::Table(table.clone()).to_string();
                let mut pairs = Vec::with_capacity(table.len());
                for (from, to) in table {
                    match to {
                        toml::Value::String(to) => pairs.push((from, to)),
                        _ => return ConfigValue::Other(rendered),
                    }
                }
                ConfigValue::Mapping(pairs)
            }
            other => ConfigValue::Other(other.to_string()),
        }
    }
}

impl From<Option<toml::Value>> for ConfigValue {
    fn from(value: Option<toml::Value>) -> Self {
        value.map(ConfigValue::from).unwrap_or(ConfigValue::Absent)
    }
}

impl From<&str> for ConfigValue {
    fn from(name: &str) -> Self {
        ConfigValue::Name(name.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(name: String) -> Self {
        ConfigValue::Name(name)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ConfigValue {
    fn from(pairs: [(&str, &str); N]) -> Self {
        ConfigValue::Mapping(
            pairs
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        )
    }
}

/// Canonical mapping of logical asset name to public link name.
///
/// Iteration is ordered by logical name so repeated runs process pairs in the
/// same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSpec {
    links: BTreeMap<String, String>,
}

impl LinkSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair, replacing any earlier public name for the same logical name.
    pub fn insert(&mut self, logical: impl Into<String>, public: impl Into<String>) {
        self.links.insert(logical.into(), public.into());
    }

    /// Merge `other` into `self`; entries from `other` win on collision.
    pub fn merge(&mut self, other: LinkSpec) {
        self.links.extend(other.links);
    }

    pub fn get(&self, logical: &str) -> Option<&str> {
        self.links.get(logical).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links
            .iter()
            .map(|(logical, public)| (logical.as_str(), public.as_str()))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LinkSpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut spec = LinkSpec::new();
        for (logical, public) in iter {
            spec.insert(logical, public);
        }
        spec
    }
}

impl<const N: usize> From<[(&str, &str); N]> for LinkSpec {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Flatten a configuration value into one canonical [`LinkSpec`].
///
/// Lists are merged left to right, so a later entry for the same logical
/// name replaces an earlier one. Pure; never touches the filesystem.
pub fn normalize(value: &ConfigValue) -> Result<LinkSpec> {
    match value {
        ConfigValue::Absent => Ok(LinkSpec::new()),
        ConfigValue::Name(name) => Ok(LinkSpec::from_iter([(name.as_str(), name.as_str())])),
        ConfigValue::Mapping(pairs) => Ok(pairs
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect()),
        ConfigValue::List(items) => items
            .iter()
            .try_fold(LinkSpec::new(), |mut acc, item| -> Result<LinkSpec> {
                acc.merge(normalize(item)?);
                Ok(acc)
            }),
        ConfigValue::Other(raw) => Err(LinkError::InvalidConfiguration(raw.clone())),
    }
}
