use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::links::{normalize, ConfigValue, LinkSpec};
use crate::manifest::AssetLookup;
use crate::paths::{normalize_lexically, relative_from};

/// Links are always published here, relative to the project root.
const PUBLIC_ASSETS_DIR: &str = "public/assets";

/// Everything the resolver needs to know about the project it links in.
pub struct ResolutionContext {
    root: PathBuf,
    public_dir: PathBuf,
    compiled_dir: PathBuf,
    lookup: Box<dyn AssetLookup>,
}

impl ResolutionContext {
    /// `prefix` is the URL prefix compiled assets are served under
    /// (`/assets` by default); artifacts live in `root/public/<prefix>`.
    pub fn new(root: impl AsRef<Path>, prefix: &str, lookup: impl AssetLookup + 'static) -> Self {
        let root = root.as_ref();
        let root = normalize_lexically(&std::path::absolute(root).unwrap_or_else(|_| root.into()));
        let public_dir = root.join(PUBLIC_ASSETS_DIR);
        let compiled_dir = compiled_dir(&root, prefix);

        Self {
            root,
            public_dir,
            compiled_dir,
            lookup: Box::new(lookup),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the public links are created in.
    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Directory the fingerprinted artifacts live in.
    pub fn compiled_dir(&self) -> &Path {
        &self.compiled_dir
    }

    /// Absolute link path for `public_name`.
    ///
    /// Names that resolve to `public_dir` itself or outside of it (absolute
    /// paths, `..` segments) are rejected.
    pub fn public_path(&self, logical_name: &str, public_name: &str) -> Result<PathBuf> {
        let path = normalize_lexically(&self.public_dir.join(public_name));
        if path == self.public_dir || !path.starts_with(&self.public_dir) {
            return Err(LinkError::OutsidePublicDir {
                logical: logical_name.to_string(),
                public: public_name.to_string(),
                public_dir: self.public_dir.clone(),
            });
        }
        Ok(path)
    }

    fn find(&self, logical_name: &str) -> Result<PathBuf> {
        self.lookup
            .find(logical_name)
            .ok_or_else(|| LinkError::AssetNotFound(logical_name.to_string()))
    }
}

impl fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("root", &self.root)
            .field("public_dir", &self.public_dir)
            .field("compiled_dir", &self.compiled_dir)
            .finish_non_exhaustive()
    }
}

/// Directory for a URL prefix: `root/public/<prefix>` without the leading slash.
pub fn compiled_dir(root: &Path, prefix: &str) -> PathBuf {
    let prefix = prefix.trim_matches('/');
    let public = root.join("public");
    if prefix.is_empty() {
        public
    } else {
        normalize_lexically(&public.join(prefix))
    }
}

/// What a public link looks like on disk right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing exists at the link path.
    Missing,
    /// A symlink with the expected target.
    Current,
    /// A symlink pointing somewhere else.
    Stale(PathBuf),
    /// A regular file or directory is in the way.
    Occupied,
}

/// A resolved link for one logical asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicLink {
    pub logical_name: String,
    pub public_name: String,
    /// Absolute path of the symlink.
    pub path: PathBuf,
    /// Absolute path of the fingerprinted artifact.
    pub artifact: PathBuf,
    /// Symlink target, relative to the directory holding the link.
    pub target: PathBuf,
}

impl PublicLink {
    /// Directory the link lives in.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("/"))
    }

    /// Inspect the link path without modifying it.
    ///
    /// Only a path that does not exist is `Missing`; any other failure to
    /// read it is returned.
    pub fn state(&self) -> io::Result<LinkState> {
        let meta = match fs::symlink_metadata(&self.path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(LinkState::Missing),
            Err(err) => return Err(err),
        };
        if !meta.file_type().is_symlink() {
            return Ok(LinkState::Occupied);
        }
        let current = fs::read_link(&self.path)?;
        if current == self.target {
            Ok(LinkState::Current)
        } else {
            Ok(LinkState::Stale(current))
        }
    }

    /// Create the parent directory and point the link at its artifact.
    ///
    /// An existing link or file at the path is replaced in a single rename,
    /// so readers never observe the path missing.
    pub fn create(&self) -> Result<()> {
        let dir = self.dir().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| LinkError::DirectoryCreation {
            path: dir.clone(),
            source,
        })?;

        let staging = self.staging_path();
        self.replace_with_staged(&staging).map_err(|source| {
            let _ = fs::remove_file(&staging);
            LinkError::LinkCreation {
                path: self.path.clone(),
                target: self.target.clone(),
                source,
            }
        })?;

        info!("Linked {:?} -> {:?}", self.path, self.target);
        Ok(())
    }

    // Fixed length, so link names up to NAME_MAX still fit. Links are
    // created one at a time, so one staging entry per directory is enough.
    fn staging_path(&self) -> PathBuf {
        self.dir()
            .join(format!(".asset-symlink-{}.tmp", std::process::id()))
    }

    fn replace_with_staged(&self, staging: &Path) -> io::Result<()> {
        if fs::symlink_metadata(staging).is_ok() {
            fs::remove_file(staging)?;
        }
        symlink(&self.target, staging)?;
        fs::rename(staging, &self.path)
    }
}

/// Resolve one pair into a [`PublicLink`] without touching the filesystem.
pub fn plan_link(
    logical_name: &str,
    public_name: &str,
    ctx: &ResolutionContext,
) -> Result<PublicLink> {
    let path = ctx.public_path(logical_name, public_name)?;
    let hashed = ctx.find(logical_name)?;
    debug!("Resolved {logical_name} to {:?}", hashed);

    let artifact = normalize_lexically(&ctx.compiled_dir.join(&hashed));
    let dir = path.parent().unwrap_or(Path::new("/"));

    let target = relative_from(&artifact, dir).ok_or_else(|| LinkError::LinkCreation {
        path: path.clone(),
        target: artifact.clone(),
        source: io::Error::new(
            io::ErrorKind::InvalidInput,
            "artifact is not reachable from the link directory",
        ),
    })?;

    Ok(PublicLink {
        logical_name: logical_name.to_string(),
        public_name: public_name.to_string(),
        path,
        artifact,
        target,
    })
}

/// Check that every public name stays inside the public directory and that
/// no two logical names share a link path. Touches nothing on disk.
pub fn validate_destinations(spec: &LinkSpec, ctx: &ResolutionContext) -> Result<()> {
    let mut seen: HashMap<PathBuf, &str> = HashMap::with_capacity(spec.len());
    for (logical, public) in spec.iter() {
        let path = ctx.public_path(logical, public)?;
        if let Some(first) = seen.insert(path.clone(), logical) {
            return Err(LinkError::DuplicateLink {
                path,
                first: first.to_string(),
                second: logical.to_string(),
            });
        }
    }
    Ok(())
}

/// Resolve every pair, stopping at the first asset that cannot be found.
pub fn plan(spec: &LinkSpec, ctx: &ResolutionContext) -> Result<Vec<PublicLink>> {
    validate_destinations(spec, ctx)?;
    spec.iter()
        .map(|(logical, public)| plan_link(logical, public, ctx))
        .collect()
}

/// Create or refresh the link for every pair.
///
/// Destinations are validated up front, so a clash or an escaping name fails
/// before anything is written. Pairs are then handled one at a time in
/// logical-name order. The first failure stops the run and is returned;
/// links made for earlier pairs are kept.
pub fn link(spec: &LinkSpec, ctx: &ResolutionContext) -> Result<Vec<PublicLink>> {
    validate_destinations(spec, ctx)?;
    let mut linked = Vec::with_capacity(spec.len());
    for (logical, public) in spec.iter() {
        let public_link = plan_link(logical, public, ctx)?;
        public_link.create()?;
        linked.push(public_link);
    }
    Ok(linked)
}

/// Normalize `config` and link every pair it names.
pub fn execute(config: &ConfigValue, ctx: &ResolutionContext) -> Result<Vec<PublicLink>> {
    let spec = normalize(config)?;
    debug!("Linking {} asset(s) into {:?}", spec.len(), ctx.public_dir);
    link(&spec, ctx)
}
