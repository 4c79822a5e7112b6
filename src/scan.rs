use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::MappersError;
use crate::extract::{self, SourceFile};
use crate::lang;
use crate::model::Registry;
use crate::util;

/// Walk `config.current_dir` depth-first and build the mapper registry.
///
/// Entries are visited sorted by file name, each directory at its own
/// position among its siblings, so a later entry's mappers overwrite an
/// earlier one's on key collision. Directories named in the ignore list are
/// pruned with all their descendants; the scan root itself is never pruned.
/// Any filesystem or parse failure aborts the scan.
pub fn scan(config: &ScanConfig) -> Result<Registry, MappersError> {
    let output_root = util::absolute_normalized(&config.output_dir)?;
    let scan_root = util::absolute_normalized(&config.current_dir)?;

    // The root must be a listable directory; a file root is not an empty scan.
    std::fs::read_dir(&scan_root).map_err(|e| MappersError::io(&scan_root, e))?;

    let mut registry = Registry::new();
    let mut files_scanned = 0usize;

    let walker = WalkDir::new(&scan_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_pruned(e, config));

    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        if entry.depth() == 0 || !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !config.is_mapper_file(&name) {
            continue;
        }

        let relative = recorded_path(&output_root, entry.path(), config.remove_extension);
        tracing::debug!(
            path = %entry.path().display(),
            relative = %relative,
            "scanning mapper file"
        );

        let text = std::fs::read_to_string(entry.path())
            .map_err(|e| MappersError::io(entry.path(), e))?;
        let file = SourceFile {
            path: entry.path(),
            relative_path: &relative,
            text: &text,
        };

        for mapper in extract::extract(&file, config)? {
            let key = mapper.key.clone();
            let new_ref = mapper.reference.clone();
            if let Some(old_ref) = registry.insert(mapper) {
                if old_ref != new_ref {
                    tracing::debug!(key = %key, old = %old_ref, new = %new_ref, "mapper key overwritten");
                }
            }
        }
        files_scanned += 1;
    }

    tracing::info!(
        root = %scan_root.display(),
        files = files_scanned,
        mappers = registry.len(),
        "mapper scan complete"
    );

    Ok(registry)
}

/// Excluded directories below the scan root.
fn is_pruned(entry: &DirEntry, config: &ScanConfig) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && config.is_ignored_dir(&entry.file_name().to_string_lossy())
}

/// Path of `file` relative to the output root with `/` separators,
/// optionally without its TypeScript extension.
fn recorded_path(output_root: &Path, file: &Path, remove_extension: bool) -> String {
    let rel = util::to_posix(&util::relative_to(output_root, file));
    if remove_extension {
        lang::strip_source_extension(&rel).to_string()
    } else {
        rel
    }
}

fn walk_error(err: walkdir::Error) -> MappersError {
    let path = err
        .path()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    MappersError::Walk { path, source: err }
}
