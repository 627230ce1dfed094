use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Batch regex rewriting and renaming for file trees.
///
/// All rules are applied simultaneously, so replacements never cascade into
/// one another and swaps (foo -> bar, bar -> foo) work in one pass. File
/// operations are atomic and leave backups; with no paths, rewrites stdin to
/// stdout.
#[derive(Parser, Debug)]
#[command(name = "remold")]
#[command(author, version, about)]
pub struct Cli {
    /// Single replacement: match pattern
    #[arg(long = "from", value_name = "PATTERN", requires = "to_pat")]
    pub from_pat: Option<String>,

    /// Single replacement: replacement string
    #[arg(long = "to", value_name = "REPLACEMENT", requires = "from_pat")]
    pub to_pat: Option<String>,

    /// File with one 'pattern<TAB>replacement' rule per line
    #[arg(
        short = 'p',
        long = "patterns",
        value_name = "FILE",
        conflicts_with_all = ["from_pat", "to_pat"]
    )]
    pub pat_file: Option<PathBuf>,

    /// Rename files and rewrite contents
    #[arg(long)]
    pub full: bool,

    /// Rename files only; do not modify contents
    #[arg(long, conflicts_with = "full")]
    pub renames: bool,

    /// Exact string matching, rather than regular expression matching
    #[arg(long)]
    pub literal: bool,

    /// Match case-insensitively
    #[arg(short = 'i', long)]
    pub insensitive: bool,

    /// Match . to newlines
    #[arg(long)]
    pub dotall: bool,

    /// Also rewrite the lowerCamel, UpperCamel, lower_underscore, and
    /// UPPER_UNDERSCORE variants of each rule
    #[arg(long = "preserve-case", conflicts_with = "insensitive")]
    pub preserve_case: bool,

    /// Require word breaks (regex \b) around all matches
    #[arg(short = 'b', long = "word-breaks")]
    pub word_breaks: bool,

    /// File name regex to include (default: all files)
    #[arg(long, value_name = "REGEX")]
    pub include: Option<String>,

    /// File or directory name regex to exclude (default: names starting with '.')
    #[arg(long, value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Transform each file's contents at once, instead of line by line
    #[arg(long = "at-once")]
    pub at_once: bool,

    /// Parse and show patterns only
    #[arg(short = 't', long = "parse-only")]
    pub parse_only: bool,

    /// Only walk directories and list the files that would be processed
    #[arg(long = "walk-only")]
    pub walk_only: bool,

    /// Dry run: log matches without changing any files
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Suffix for backup files (default: .orig)
    #[arg(long = "backup-suffix", value_name = ".SUFFIX")]
    pub backup_suffix: Option<String>,

    /// Restore original files from backups (requires the same patterns as
    /// the original run)
    #[arg(long)]
    pub undo: bool,

    /// Remove backup files (standalone; no patterns needed)
    #[arg(
        long = "clean-backups",
        conflicts_with_all = ["pat_file", "from_pat", "to_pat", "undo"]
    )]
    pub clean_backups: bool,

    /// Root paths to process (reads stdin and writes stdout when omitted)
    pub root_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Human-readable output
    Text,
    /// Machine-parseable output
    Json,
}
