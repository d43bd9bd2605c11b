use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning configuration into public asset links.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("unexpected item {0} in asset symlink configuration")]
    InvalidConfiguration(String),

    #[error("no compiled asset found for '{0}'")]
    AssetNotFound(String),

    #[error("'{first}' and '{second}' would both be linked at {path:?}")]
    DuplicateLink {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("public name {public:?} for '{logical}' is outside {public_dir:?}")]
    OutsidePublicDir {
        logical: String,
        public: String,
        public_dir: PathBuf,
    },

    #[error("failed to create directory {path:?}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create symlink {path:?} -> {target:?}")]
    LinkCreation {
        path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("asset manifest {path:?}: {reason}")]
    Manifest { path: PathBuf, reason: String },
}

impl LinkError {
    /// Logical asset name this error is about, when there is one.
    pub fn logical_name(&self) -> Option<&str> {
        match self {
            LinkError::AssetNotFound(name) => Some(name),
            LinkError::DuplicateLink { second, .. } => Some(second),
            LinkError::OutsidePublicDir { logical, .. } => Some(logical),
            _ => None,
        }
    }
}

pub type Result<T, E = LinkError> = std::result::Result<T, E>;
