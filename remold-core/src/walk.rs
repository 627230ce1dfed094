use crate::error::{Error, Result};
use crate::transform::TEMP_SUFFIX;
use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

/// Default include filter: every file name.
pub const DEFAULT_INCLUDE: &str = ".*";
/// Default exclude filter: dot-prefixed names.
pub const DEFAULT_EXCLUDE: &str = r"^\.";

/// Include/exclude patterns match from the start of a base name, like the
/// walker's defaults expect.
fn compile_filter(pattern: &str) -> Result<Regex> {
    Regex::new(&format!(r"\A(?:{pattern})")).map_err(|e| Error::PatternParse(e.to_string()))
}

fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

/// All files under the roots, with excluded directories pruned before
/// descent. File roots are passed through untouched; name filters are the
/// caller's job. Unreadable entries are silently skipped.
fn enumerate_files(root_paths: &[String], exclude: &Regex) -> Vec<String> {
    let mut out = Vec::new();
    for root in root_paths {
        if Path::new(root).is_file() {
            out.push(root.clone());
            continue;
        }
        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || entry
                    .file_name()
                    .to_str()
                    .map_or(true, |name| !exclude.is_match(name))
        });
        for entry in walker.flatten() {
            if entry.file_type().is_file() {
                out.push(entry.path().to_string_lossy().into_owned());
            }
        }
    }
    out
}

/// Walk the given paths and return files matching the include/exclude
/// patterns, sorted by full path for deterministic processing.
///
/// Files ending in the backup or temp suffix are never processable; they are
/// filtered out and counted so callers can report leftover artifacts.
pub fn walk_files(
    root_paths: &[String],
    include_pat: &str,
    exclude_pat: &str,
    backup_suffix: &str,
) -> Result<(Vec<String>, usize)> {
    let include = compile_filter(include_pat)?;
    let exclude = compile_filter(exclude_pat)?;

    let mut out = Vec::new();
    let mut skipped_backups = 0;
    for path in enumerate_files(root_paths, &exclude) {
        if path.ends_with(backup_suffix) || path.ends_with(TEMP_SUFFIX) {
            skipped_backups += 1;
        } else {
            let name = base_name(&path);
            if include.is_match(name) && !exclude.is_match(name) {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok((out, skipped_backups))
}

/// Find all files ending with the backup suffix in the given paths.
pub fn find_backup_files(
    root_paths: &[String],
    backup_suffix: &str,
    include_pat: &str,
    exclude_pat: &str,
) -> Result<Vec<String>> {
    let include = compile_filter(include_pat)?;
    let exclude = compile_filter(exclude_pat)?;

    let mut out = Vec::new();
    for path in enumerate_files(root_paths, &exclude) {
        let name = base_name(&path);
        if path.ends_with(backup_suffix) && include.is_match(name) && !exclude.is_match(name) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}
