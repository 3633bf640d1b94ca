pub mod collect;
pub mod generate;
pub mod run;

use crate::error::{CliError, Result};
use qcflow::core::methods::{self, Method};
use std::path::{Path, PathBuf};
use tracing::info;

/// Files with the given extension directly under `dir`, sorted by name so
/// batches are deterministic.
pub(crate) fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(CliError::Argument(format!(
            "no .{extension} files found in '{}'",
            dir.display()
        )));
    }
    Ok(files)
}

/// The job name derived from a geometry file: its stem.
pub(crate) fn job_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "job".to_string())
}

/// Resolves the requested method names, or every independently runnable
/// method when none were given. Derived methods that were explicitly
/// requested are reported and dropped; they are computed from their parent's
/// output, never submitted.
pub(crate) fn selected_methods(requested: &[String]) -> Result<Vec<&'static Method>> {
    let mut selected = Vec::new();
    if requested.is_empty() {
        selected.extend(methods::available_methods().filter(|m| !m.is_redundant()));
        selected.sort_by_key(|m| m.name);
        return Ok(selected);
    }
    for name in requested {
        let method = Method::lookup(name).map_err(|e| CliError::Argument(e.to_string()))?;
        if let Some(parent) = method.redundancy {
            info!(
                "skipping '{}': its energy is derived from a '{}' run",
                method.name, parent
            );
            continue;
        }
        selected.push(method);
    }
    if selected.is_empty() {
        return Err(CliError::Argument(
            "no runnable methods selected".to_string(),
        ));
    }
    Ok(selected)
}
