//! `cerno init <path>`: register a project directory for scanning.

use std::path::Path;

use cerno_core::error::Error;
use cerno_core::types::WatchedProject;

use crate::app::App;

pub async fn run(app: &App, path: &Path, name: Option<String>) -> anyhow::Result<()> {
    let canonical = path
        .canonicalize()
        .map_err(|_| Error::InputValidation(format!("path does not exist: {}", path.display())))?;
    if !canonical.is_dir() {
        return Err(Error::InputValidation(format!("not a directory: {}", canonical.display())).into());
    }

    let path_str = canonical.display().to_string();
    let project_name = name.unwrap_or_else(|| {
        canonical
            .file_name()
            .map_or_else(|| path_str.clone(), |n| n.to_string_lossy().into_owned())
    });

    if app.metadata_store.watched_project(&path_str).await?.is_some() {
        println!("already watching {path_str}");
        return Ok(());
    }

    let project = WatchedProject::new(project_name.clone(), path_str.clone());
    app.metadata_store.upsert_watched_project(project).await?;
    println!("now watching '{project_name}' at {path_str}");
    Ok(())
}
