use crate::error::{Error, Result};
use crate::logging::{Log, NullLog};
use crate::pattern::Rule;
use crate::replace::multi_replace;
use crate::transform::move_file;
use crate::walk::find_backup_files;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

fn modified_time(path: &str) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| Error::io(path, e))
}

/// Restore original files from backups, using the rule set to reverse
/// predicted renames.
///
/// For each backup at `X + backup_suffix`: apply the rules to `X` to predict
/// where the file was renamed to; skip with a warning when the predicted file
/// is missing or when the backup is newer than it (the state looks
/// inconsistent, so we refuse to guess); otherwise move the backup back over
/// `X` and remove the renamed file. Returns (restored, skipped).
pub fn undo_backups(
    root_paths: &[String],
    rules: &[Rule],
    backup_suffix: &str,
    include_pat: &str,
    exclude_pat: &str,
    dry_run: bool,
    log: &dyn Log,
) -> Result<(usize, usize)> {
    let backup_files = find_backup_files(root_paths, backup_suffix, include_pat, exclude_pat)?;

    let mut restored = 0;
    let mut skipped = 0;
    for backup_path in backup_files {
        let Some(original_path) = backup_path.strip_suffix(backup_suffix) else {
            continue;
        };
        let original_path = original_path.to_string();

        let (predicted, _) = multi_replace(original_path.as_bytes(), rules, None, &NullLog);
        let predicted_path = String::from_utf8(predicted)
            .map_err(|_| Error::InvalidPath(original_path.clone()))?;

        let target_path = if predicted_path == original_path {
            // No rename happened, just a content change.
            &original_path
        } else {
            &predicted_path
        };

        if !Path::new(target_path).exists() {
            log.log(&format!(
                "- skip: {backup_path}: expected '{target_path}' not found"
            ));
            skipped += 1;
            continue;
        }
        if modified_time(&backup_path)? > modified_time(target_path)? {
            log.log(&format!(
                "- skip: {backup_path}: backup is newer than current file"
            ));
            skipped += 1;
            continue;
        }

        if dry_run {
            log.log(&format!(
                "- restore (dry-run): {backup_path} -> {original_path}"
            ));
        } else {
            move_file(&backup_path, &original_path, true)?;
            if predicted_path != original_path && Path::new(&predicted_path).exists() {
                fs::remove_file(&predicted_path)
                    .map_err(|e| Error::io(predicted_path.as_str(), e))?;
            }
            log.log(&format!("- restore: {backup_path} -> {original_path}"));
        }
        restored += 1;
    }

    Ok((restored, skipped))
}

/// Remove backup files. Returns how many were removed (or would be, in
/// dry-run mode).
pub fn clean_backups(
    root_paths: &[String],
    backup_suffix: &str,
    include_pat: &str,
    exclude_pat: &str,
    dry_run: bool,
    log: &dyn Log,
) -> Result<usize> {
    let backup_files = find_backup_files(root_paths, backup_suffix, include_pat, exclude_pat)?;

    let mut removed = 0;
    for backup_path in backup_files {
        if dry_run {
            log.log(&format!("- remove (dry-run): {backup_path}"));
        } else {
            fs::remove_file(&backup_path).map_err(|e| Error::io(backup_path.as_str(), e))?;
            log.log(&format!("- remove: {backup_path}"));
        }
        removed += 1;
    }

    Ok(removed)
}
