use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Asset Symlink - stable public names for fingerprinted assets
///
/// asset-symlink reads the links to publish from `config/asset_symlink.toml`,
/// looks every logical asset name up in the asset pipeline's manifest, and
/// points a relative symlink under `public/assets` at the fingerprinted file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root (the directory containing `public/`)
    #[arg(
        short,
        long,
        global = true,
        env = "ASSET_SYMLINK_ROOT",
        default_value = ".",
        value_name = "DIR"
    )]
    pub root: PathBuf,

    /// Config file, relative to the project root
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// URL prefix compiled assets are served under (overrides config)
    #[arg(long, global = true, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Asset manifest, relative to the project root (overrides config)
    #[arg(long, global = true, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or refresh every configured symlink
    ///
    /// Stops at the first asset that cannot be resolved or linked.
    Link,

    /// Show the symlinks `link` would create without touching the filesystem
    Plan,

    /// Validate configuration and report missing assets and stale links
    Check,
}
