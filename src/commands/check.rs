use crate::resolver::{plan_link, validate_destinations, LinkState};
use crate::{links, ui, Project};
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
    validate_destinations(&spec, &ctx)?;
    let mut missing = Vec::new();

    // Unlike `link`, keep going so every unresolved name is reported at once.
    for (logical, public) in spec.iter() {
        let link = match plan_link(logical, public, &ctx) {
            Ok(link) => link,
            Err(err) => match err.logical_name() {
                Some(name) => {
                    missing.push(name.to_string());
                    continue;
                }
                None => return Err(err.into()),
            },
        };

        let state = link
            .state()
            .with_context(|| format!("Failed to inspect {:?}", link.path))?;
        match state {
            LinkState::Current => ui::success("Current", &link.public_name),
            LinkState::Missing => ui::status("Missing", &link.public_name),
            LinkState::Stale(current) => ui::warn(format!(
                "{} points at {} (expected {})",
                link.public_name,
                current.display(),
                link.target.display()
            )),
            LinkState::Occupied => ui::warn(format!(
                "{} exists and is not a symlink",
                link.public_name
            )),
        }
    }

    if missing.is_empty() {
        ui::success(
            "Check",
            format!(
                "All {} configured asset(s) resolved under {:?}.",
                spec.len(),
                ctx.root()
            ),
        );
        Ok(())
    } else {
        for name in &missing {
            ui::error(format!("no compiled asset found for '{name}'"));
        }
        anyhow::bail!("{} configured asset(s) are missing.", missing.len());
    }
}
