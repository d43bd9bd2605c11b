use crate::{links, resolver, ui, Project};
use anyhow::{Context, Result};

pub fn execute(project: &Project) -> Result<()> {
    let spec = links::normalize(&project.links())?;
    if spec.is_empty() {
        ui::info(format!(
            "No symlinks configured in {:?}",
            project.config_path()
        ));
        return Ok(());
    }

    let ctx = project.context()?;
    let links = resolver::link(&spec, &ctx)
        .with_context(|| format!("Failed to link assets into {:?}", ctx.public_dir()))?;

    for link in &links {
        ui::success(
            "Linked",
            format!("{} -> {}", link.public_name, link.target.display()),
        );
    }
    ui::success("Finished", format!("{} symlink(s) up to date", links.len()));
    Ok(())
}
