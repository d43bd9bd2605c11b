use crate::{links, resolver, ui, Project};
use anyhow::Result;

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
    for link in resolver::plan(&spec, &ctx)? {
        ui::status(
            "Would link",
            format!(
                "{} -> {} ({})",
                link.public_name,
                link.target.display(),
                link.logical_name
            ),
        );
    }
    Ok(())
}
