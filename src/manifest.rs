use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::error::{LinkError, Result};

/// Lookup into the asset pipeline: logical name to fingerprinted path.
///
/// The returned path is relative to the compiled assets directory, e.g.
/// `widget-abc123.js` or `external/widget-abc123.js`.
pub trait AssetLookup {
    fn find(&self, logical_name: &str) -> Option<PathBuf>;
}

impl AssetLookup for BTreeMap<String, String> {
    fn find(&self, logical_name: &str) -> Option<PathBuf> {
        self.get(logical_name).map(PathBuf::from)
    }
}

impl AssetLookup for HashMap<String, String> {
    fn find(&self, logical_name: &str) -> Option<PathBuf> {
        self.get(logical_name).map(PathBuf::from)
    }
}

/// Manifest written by the asset pipeline after precompiling.
///
/// Only the `assets` table is consulted; `files` carries per-artifact
/// metadata we have no use for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetManifest {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default)]
    assets: BTreeMap<String, String>,
}

fn manifest_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\.sprockets-manifest-[0-9a-fA-F]+|manifest-[0-9a-fA-F]+|manifest)\.json$")
            .expect("manifest file pattern is valid")
    })
}

impl AssetManifest {
    /// Load a manifest file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| LinkError::Manifest {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let mut manifest: AssetManifest =
            serde_json::from_str(&contents).map_err(|err| LinkError::Manifest {
                path: path.to_path_buf(),
                reason: format!("invalid JSON: {err}"),
            })?;
        manifest.path = path.to_path_buf();

        debug!(
            "Loaded {} asset(s) from manifest {:?}",
            manifest.assets.len(),
            path
        );
        Ok(manifest)
    }

    /// Locate the manifest inside a compiled assets directory.
    ///
    /// Recognizes `.sprockets-manifest-<hex>.json`, `manifest-<hex>.json` and
    /// `manifest.json`. When several exist the first by name is used.
    pub fn discover(dir: &Path) -> Result<PathBuf> {
        let entries = fs::read_dir(dir).map_err(|err| LinkError::Manifest {
            path: dir.to_path_buf(),
            reason: format!("cannot read compiled assets directory: {err}"),
        })?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| manifest_name_pattern().is_match(name))
            })
            .map(|entry| entry.path())
            .collect();
        candidates.sort();

        if candidates.len() > 1 {
            warn!(
                "Found {} asset manifests in {:?}; using {:?}",
                candidates.len(),
                dir,
                candidates[0]
            );
        }

        candidates
            .into_iter()
            .next()
            .ok_or_else(|| LinkError::Manifest {
                path: dir.to_path_buf(),
                reason: "no asset manifest found (run the asset pipeline first)".to_string(),
            })
    }

    /// Discover and load the manifest for a compiled assets directory.
    pub fn discover_and_load(dir: &Path) -> Result<Self> {
        Self::load(&Self::discover(dir)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetLookup for AssetManifest {
    fn find(&self, logical_name: &str) -> Option<PathBuf> {
        self.assets.find(logical_name)
    }
}
