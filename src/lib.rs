// Public API
pub mod cli;
pub mod commands;

// Core domain types
mod config;
mod error;
pub mod links;
pub mod manifest;
pub mod paths;
mod project;
pub mod resolver;
mod ui;

// Re-export main types
pub use config::Config;
pub use error::LinkError;
pub use links::{normalize, ConfigValue, LinkSpec};
pub use manifest::{AssetLookup, AssetManifest};
pub use project::Project;
pub use resolver::{execute, link, plan, LinkState, PublicLink, ResolutionContext};
