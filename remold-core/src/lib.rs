#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod backup;
pub mod case_model;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod pattern;
pub mod replace;
pub mod rewrite;
pub mod transform;
pub mod walk;

pub use backup::{clean_backups, undo_backups};
pub use case_model::{all_case_variants, split_name, to_style, transform_expr, Style};
pub use config::{Config, CONFIG_FILE};
pub use error::{Error, Result, EXIT_ERROR, EXIT_INTERRUPTED, EXIT_SUCCESS, EXIT_USAGE};
pub use logging::{Log, MemoryLog, NullLog, StderrLog};
pub use output::{to_json, CleanReport, OutputFormat, ReplaceReport, UndoReport, WalkReport};
pub use pattern::{expand_replacement, parse_patterns, Rule, RuleFlags};
pub use replace::{multi_replace, MatchCounts};
pub use rewrite::{rewrite_file, rewrite_files, RewriteOptions, Stats};
pub use transform::{
    make_parent_dirs, move_file, transform_file, transform_stream, Transform, BACKUP_SUFFIX,
    TEMP_SUFFIX,
};
pub use walk::{find_backup_files, walk_files, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
