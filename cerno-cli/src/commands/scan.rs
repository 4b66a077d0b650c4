//! `cerno scan [<path>]`: accumulate fragments from one path, or every
//! watched project when no path is given.

use std::path::{Path, PathBuf};

use cerno_core::error::Error;
use cerno_core::parser::MarkdownParser;

use crate::app::App;

pub async fn run(app: &App, path: Option<&Path>) -> anyhow::Result<()> {
    let accumulator = app.accumulator();
    let parser = MarkdownParser;

    let targets: Vec<(PathBuf, String)> = match path {
        Some(path) => vec![(path.to_path_buf(), project_name_for(path))],
        None => app
            .metadata_store
            .list_watched_projects()
            .await?
            .into_iter()
            .filter(|p| p.active)
            .map(|p| (PathBuf::from(&p.path), p.name))
            .collect(),
    };

    if targets.is_empty() {
        println!("no watched projects; run 'cerno init <path>' first");
        return Ok(());
    }

    for (target, project_name) in targets {
        for file in collect_markdown_files(&target)? {
            match accumulator.accumulate_path(&file, &parser, &project_name).await? {
                Some(run) => println!(
                    "{}: {} fragments, {} created, {} updated",
                    file.display(),
                    run.fragments_found,
                    run.insights_created,
                    run.insights_updated
                ),
                None => println!("{}: busy or cooling down, skipped", file.display()),
            }
        }
    }

    Ok(())
}

fn project_name_for(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn collect_markdown_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(path).map_err(|_| Error::InputValidation(format!("path does not exist: {}", path.display())))?;
    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let mut stack = vec![path.to_path_buf()];
    while let Some(current) = stack.pop() {
        let entries = std::fs::read_dir(&current).map_err(|e| Error::Parse {
            path: current.display().to_string(),
            reason: e.to_string(),
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::Parse {
                path: current.display().to_string(),
                reason: e.to_string(),
            })?;
            let entry_path = entry.path();
            if entry_path.is_dir() {
                stack.push(entry_path);
            } else if entry_path.extension().is_some_and(|ext| ext == "md") {
                files.push(entry_path);
            }
        }
    }
    Ok(files)
}
