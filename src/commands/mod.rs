use crate::cli::{Cli, Commands};
use crate::Project;
use anyhow::Result;

mod check;
mod link;
mod plan;

pub fn execute(cli: Cli) -> Result<()> {
    // Load the project - this is the root entry point
    let mut project = Project::load(&cli.root, cli.config.as_deref())?;

    if let Some(prefix) = cli.prefix {
        project.set_prefix(prefix);
    }
    if let Some(manifest) = cli.manifest {
        project.set_manifest(manifest);
    }

    match cli.command {
        Commands::Link => link::execute(&project),

        Commands::Plan => plan::execute(&project),

        Commands::Check => check::execute(&project),
    }
}
