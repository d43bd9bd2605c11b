use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{Config, CONFIG_FILE};
use crate::links::ConfigValue;
use crate::manifest::AssetManifest;
use crate::paths::normalize_lexically;
use crate::resolver::{compiled_dir, ResolutionContext};

/// Project - the application whose public assets are being linked
///
/// Rooted at the directory containing `public/`; settings come from
/// `config/asset_symlink.toml` with command-line overrides on top.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    config_path: PathBuf,
    config: Config,
}

impl Project {
    /// Load the project at `root`, reading `config` or the default config file.
    pub fn load(root: &Path, config: Option<&Path>) -> Result<Self> {
        let root = std::path::absolute(root)
            .with_context(|| format!("Failed to resolve project root {:?}", root))?;
        let root = normalize_lexically(&root);

        let config_path = match config {
            Some(path) => root.join(path),
            None => root.join(CONFIG_FILE),
        };
        debug!("Loading configuration from {:?}", config_path);
        let config = Config::load(&config_path)?;

        Ok(Self {
            root,
            config_path,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Override the URL prefix from the config file.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.config.prefix = prefix.into();
    }

    /// Override the manifest location from the config file.
    pub fn set_manifest(&mut self, manifest: PathBuf) {
        self.config.manifest = Some(manifest);
    }

    /// Configured links, not yet normalized.
    pub fn links(&self) -> ConfigValue {
        self.config.links()
    }

    /// Directory holding the fingerprinted artifacts.
    pub fn compiled_dir(&self) -> PathBuf {
        compiled_dir(&self.root, &self.config.prefix)
    }

    /// Load the asset manifest, from the configured path or by discovery.
    pub fn manifest(&self) -> Result<AssetManifest> {
        let manifest = match &self.config.manifest {
            Some(path) => AssetManifest::load(&self.root.join(path))?,
            None => AssetManifest::discover_and_load(&self.compiled_dir())?,
        };
        Ok(manifest)
    }

    /// Build the resolution context backed by the project's manifest.
    pub fn context(&self) -> Result<ResolutionContext> {
        let manifest = self
            .manifest()
            .context("Failed to load the asset manifest")?;
        debug!(
            "Using {} asset(s) from {:?}",
            manifest.len(),
            manifest.path()
        );
        Ok(ResolutionContext::new(
            &self.root,
            &self.config.prefix,
            manifest,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("config")).unwrap();
        fs::write(temp.path().join(CONFIG_FILE), config).unwrap();
        temp
    }

    #[test]
    fn test_project_load_defaults() {
        let temp = TempDir::new().unwrap();
        let project = Project::load(temp.path(), None).unwrap();

        assert_eq!(project.root(), temp.path());
        assert_eq!(project.config_path(), temp.path().join(CONFIG_FILE));
        assert_eq!(project.config().prefix, "/assets");
        assert!(project.links().is_absent());
        assert_eq!(project.compiled_dir(), temp.path().join("public/assets"));
    }

    #[test]
    fn test_project_overrides() {
        let temp = setup_project("prefix = \"/assets\"\nsymlinks = \"widget.js\"\n");
        let mut project = Project::load(temp.path(), None).unwrap();

        project.set_prefix("/static/assets");
        project.set_manifest(PathBuf::from("build/manifest.json"));

        assert_eq!(
            project.compiled_dir(),
            temp.path().join("public/static/assets")
        );
        assert_eq!(
            project.config().manifest,
            Some(PathBuf::from("build/manifest.json"))
        );
        assert_eq!(project.links(), ConfigValue::Name("widget.js".into()));
    }

    #[test]
    fn test_project_custom_config_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("links.toml"), "symlinks = \"a.js\"").unwrap();

        let project = Project::load(temp.path(), Some(Path::new("links.toml"))).unwrap();
        assert_eq!(project.links(), ConfigValue::Name("a.js".into()));
    }

    #[test]
    fn test_project_context_from_explicit_manifest() {
        let temp = setup_project("manifest = \"build/manifest.json\"\n");
        fs::create_dir_all(temp.path().join("build")).unwrap();
        fs::write(
            temp.path().join("build/manifest.json"),
            r#"{ "assets": { "widget.js": "widget-abc123.js" } }"#,
        )
        .unwrap();

        let project = Project::load(temp.path(), None).unwrap();
        let manifest = project.manifest().unwrap();
        assert_eq!(manifest.len(), 1);

        let ctx = project.context().unwrap();
        assert_eq!(ctx.public_dir(), temp.path().join("public/assets"));
    }

    #[test]
    fn test_project_context_without_manifest() {
        let temp = TempDir::new().unwrap();
        let project = Project::load(temp.path(), None).unwrap();

        let err = project.context().unwrap_err();
        assert!(err.to_string().contains("Failed to load the asset manifest"));
    }
}
