use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::links::ConfigValue;

const DEFAULT_PREFIX: &str = "/assets";

/// Location of the config file, relative to the project root.
pub const CONFIG_FILE: &str = "config/asset_symlink.toml";

/// Project configuration stored in `config/asset_symlink.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URL prefix the asset pipeline serves compiled assets under.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Explicit manifest path, relative to the project root. Discovered
    /// inside the compiled assets directory when unset.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
    /// The links to publish, in any of the accepted shapes.
    #[serde(default)]
    pub symlinks: Option<toml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            manifest: None,
            symlinks: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// The `symlinks` value as a [`ConfigValue`].
    pub fn links(&self) -> ConfigValue {
        ConfigValue::from(self.symlinks.clone())
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.prefix, "/assets");
        assert!(config.manifest.is_none());
        assert!(config.links().is_absent());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config.prefix, "/assets");
    }

    #[test]
    fn test_load_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asset_symlink.toml");
        fs::write(
            &path,
            r#"
prefix = "/path/to/assets"
manifest = "public/path/to/assets/manifest.json"
symlinks = ["widget.js", { "widget.js" = "v1/widget.js" }]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.prefix, "/path/to/assets");
        assert_eq!(
            config.manifest,
            Some(PathBuf::from("public/path/to/assets/manifest.json"))
        );
        assert_eq!(
            config.links(),
            ConfigValue::List(vec![
                ConfigValue::Name("widget.js".into()),
                ConfigValue::Mapping(vec![("widget.js".into(), "v1/widget.js".into())]),
            ])
        );
    }

    #[test]
    fn test_load_invalid_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asset_symlink.toml");
        fs::write(&path, "prefix = [").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
