use crate::error::Error;
use crate::rewrite::Stats;
use serde::Serialize;
use std::str::FromStr;

/// Report rendering requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(Error::Usage(format!("unknown output format: '{other}'"))),
        }
    }
}

/// Machine-readable result of a rewrite/rename run.
#[derive(Debug, Serialize)]
pub struct ReplaceReport {
    pub operation: &'static str,
    pub dry_run: bool,
    pub patterns_count: usize,
    pub files_found: usize,
    pub bytes_read: u64,
    pub matches_found: usize,
    pub matches_applied: usize,
    pub files_changed: usize,
    pub files_rewritten: usize,
    pub files_renamed: usize,
}

impl ReplaceReport {
    pub fn new(dry_run: bool, patterns_count: usize, stats: &Stats) -> Self {
        Self {
            operation: "replace",
            dry_run,
            patterns_count,
            files_found: stats.files,
            bytes_read: stats.bytes,
            matches_found: stats.matches,
            matches_applied: stats.valid_matches,
            files_changed: stats.files_changed,
            files_rewritten: stats.files_rewritten,
            files_renamed: stats.renames,
        }
    }
}

/// Machine-readable result of an undo run.
#[derive(Debug, Serialize)]
pub struct UndoReport {
    pub operation: &'static str,
    pub dry_run: bool,
    pub restored: usize,
    pub skipped: usize,
}

impl UndoReport {
    pub fn new(dry_run: bool, restored: usize, skipped: usize) -> Self {
        Self {
            operation: "undo",
            dry_run,
            restored,
            skipped,
        }
    }
}

/// Machine-readable result of a backup cleanup.
#[derive(Debug, Serialize)]
pub struct CleanReport {
    pub operation: &'static str,
    pub dry_run: bool,
    pub removed: usize,
}

impl CleanReport {
    pub fn new(dry_run: bool, removed: usize) -> Self {
        Self {
            operation: "clean_backups",
            dry_run,
            removed,
        }
    }
}

/// Machine-readable result of a walk-only run.
#[derive(Debug, Serialize)]
pub struct WalkReport {
    pub operation: &'static str,
    pub paths: Vec<String>,
    pub files_found: usize,
    pub skipped_backups: usize,
}

impl WalkReport {
    pub fn new(paths: Vec<String>, skipped_backups: usize) -> Self {
        Self {
            operation: "walk",
            files_found: paths.len(),
            paths,
            skipped_backups,
        }
    }
}

/// Render any report as pretty-printed JSON.
pub fn to_json<T: Serialize>(report: &T) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
