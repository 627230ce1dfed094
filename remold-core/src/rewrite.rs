use crate::error::{Error, Result};
use crate::logging::Log;
use crate::pattern::Rule;
use crate::replace::multi_replace;
use crate::transform::{transform_file, BACKUP_SUFFIX};
use crate::walk::{walk_files, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
use serde::Serialize;

/// Tally for one engine invocation. Owned by the caller and threaded through
/// the dispatcher, so concurrent invocations on distinct rule sets never
/// share counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Files read or renamed.
    pub files: usize,
    /// Content bytes scanned (paths are not counted).
    pub bytes: u64,
    /// Candidate matches before overlap pruning.
    pub matches: usize,
    /// Matches actually applied.
    pub valid_matches: usize,
    /// Files rewritten or renamed.
    pub files_changed: usize,
    /// Files whose contents had candidate matches.
    pub files_rewritten: usize,
    /// Files moved to a new path.
    pub renames: usize,
}

/// Options for a rewrite pass over a tree.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Apply the rule set to file paths and move files accordingly.
    pub do_renames: bool,
    /// Apply the rule set to file contents.
    pub do_contents: bool,
    /// Base-name regex a file must match to be processed.
    pub include: String,
    /// Base-name regex that prunes directories and skips files.
    pub exclude: String,
    /// Suffix for backups of modified files.
    pub backup_suffix: String,
    /// Match line by line (true) or against whole files (false).
    pub by_line: bool,
    /// Match, log, and count, but change nothing on disk.
    pub dry_run: bool,
    /// Abort on the first per-file error instead of logging and continuing.
    pub strict: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            do_renames: false,
            do_contents: true,
            include: DEFAULT_INCLUDE.to_string(),
            exclude: DEFAULT_EXCLUDE.to_string(),
            backup_suffix: BACKUP_SUFFIX.to_string(),
            by_line: true,
            dry_run: false,
            strict: false,
        }
    }
}

/// Rewrite and/or rename one file, applying the whole rule set
/// simultaneously to its path and contents.
pub fn rewrite_file(
    path: &str,
    rules: &[Rule],
    options: &RewriteOptions,
    stats: &mut Stats,
    log: &dyn Log,
) -> Result<()> {
    // Paths are matched as bytes like any other input, then handed back to
    // the filesystem as UTF-8 strings.
    let dest_path = if options.do_renames {
        let (replaced, _) = multi_replace(path.as_bytes(), rules, None, log);
        String::from_utf8(replaced).map_err(|_| Error::InvalidPath(path.to_string()))?
    } else {
        path.to_string()
    };

    let counts = if options.do_contents {
        let mut transform =
            |input: &[u8]| multi_replace(input, rules, Some(path), log);
        transform_file(
            Some(&mut transform),
            path,
            &dest_path,
            &options.backup_suffix,
            options.by_line,
            options.dry_run,
            stats,
        )?
    } else {
        transform_file(
            None,
            path,
            &dest_path,
            &options.backup_suffix,
            options.by_line,
            options.dry_run,
            stats,
        )?
    };
    stats.matches += counts.found;
    stats.valid_matches += counts.valid;

    if counts.found > 0 {
        log.log(&format!("- modify: {path}: {} matches", counts.found));
    }
    if dest_path != path {
        log.log(&format!("- rename: {path} -> {dest_path}"));
    }
    Ok(())
}

/// Walk the given roots and rewrite/rename every matching file in sorted
/// order. Per-file errors are logged and skipped unless `strict` is set.
pub fn rewrite_files(
    root_paths: &[String],
    rules: &[Rule],
    options: &RewriteOptions,
    stats: &mut Stats,
    log: &dyn Log,
) -> Result<()> {
    let (paths, skipped_backups) = walk_files(
        root_paths,
        &options.include,
        &options.exclude,
        &options.backup_suffix,
    )?;
    if skipped_backups > 0 {
        log.log(&format!(
            "Skipped {skipped_backups} file(s) ending in '{}' (backup files are never processed)",
            options.backup_suffix
        ));
    }
    log.log(&format!(
        "Found {} files in: {}",
        paths.len(),
        root_paths.join(", ")
    ));
    for path in &paths {
        if let Err(e) = rewrite_file(path, rules, options, stats, log) {
            if options.strict {
                return Err(e);
            }
            log.log(&format!("error: {e}"));
        }
    }
    Ok(())
}
