use bstr::ByteSlice;
use clap::Parser;
use remold_core::{
    clean_backups, multi_replace, parse_patterns, rewrite_files, to_json, transform_stream,
    undo_backups, walk_files, CleanReport, Config, Error, Log, NullLog, OutputFormat,
    ReplaceReport, RewriteOptions, Rule, RuleFlags, Stats, StderrLog, UndoReport, WalkReport,
    EXIT_INTERRUPTED,
};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::process;

mod args;

use args::{Cli, FormatArg};

fn main() {
    ctrlc::set_handler(|| {
        eprintln!("\nInterrupted");
        process::exit(EXIT_INTERRUPTED);
    })
    .expect("Error setting SIGINT handler");

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> remold_core::Result<()> {
    let config = Config::load()?;
    let backup_suffix = cli
        .backup_suffix
        .clone()
        .unwrap_or(config.backup_suffix);
    let include = cli.include.clone().unwrap_or(config.include);
    let exclude = cli.exclude.clone().unwrap_or(config.exclude);
    let by_line = !(cli.at_once || config.at_once);
    let format = match cli.format {
        Some(FormatArg::Text) => OutputFormat::Text,
        Some(FormatArg::Json) => OutputFormat::Json,
        None => config.format.parse()?,
    };
    let json_mode = format == OutputFormat::Json;

    if !backup_suffix.starts_with('.') {
        return Err(Error::Usage(
            "--backup-suffix must start with '.'".to_string(),
        ));
    }

    // In JSON mode text output is suppressed; the report goes to stdout at
    // the end.
    let sink: Box<dyn Log> = if cli.quiet || json_mode {
        Box::new(NullLog)
    } else {
        Box::new(StderrLog)
    };
    let log: &dyn Log = sink.as_ref();

    if cli.walk_only {
        let (paths, skipped_backups) =
            walk_files(&cli.root_paths, &include, &exclude, &backup_suffix)?;
        if json_mode {
            println!("{}", to_json(&WalkReport::new(paths, skipped_backups)));
        } else {
            log_skipped_backups(log, skipped_backups, &backup_suffix);
            log.log(&format!(
                "Found {} files in: {}",
                paths.len(),
                cli.root_paths.join(", ")
            ));
            for path in &paths {
                log.log(&format!("- {path}"));
            }
        }
        return Ok(());
    }

    if cli.clean_backups {
        if cli.root_paths.is_empty() {
            return Err(Error::Usage(
                "--clean-backups requires paths to process".to_string(),
            ));
        }
        if cli.dry_run {
            log.log("Dry run: No files will be changed");
        }
        let removed = clean_backups(
            &cli.root_paths,
            &backup_suffix,
            &include,
            &exclude,
            cli.dry_run,
            log,
        )?;
        if json_mode {
            println!("{}", to_json(&CleanReport::new(cli.dry_run, removed)));
        } else {
            let action = if cli.dry_run { "Would remove" } else { "Removed" };
            log.log(&format!("{action} {removed} backup file(s)"));
        }
        return Ok(());
    }

    let pattern_text = if let Some(pat_file) = &cli.pat_file {
        fs::read_to_string(pat_file).map_err(|e| Error::io(pat_file.as_path(), e))?
    } else if let (Some(from), Some(to)) = (&cli.from_pat, &cli.to_pat) {
        format!("{from}\t{to}")
    } else {
        return Err(Error::Usage(
            "must specify --patterns or both --from and --to".to_string(),
        ));
    };

    let flags = RuleFlags {
        literal: cli.literal,
        word_breaks: cli.word_breaks,
        insensitive: cli.insensitive,
        dotall: cli.dotall,
        preserve_case: cli.preserve_case,
    };
    let rules = parse_patterns(&pattern_text, flags)?;

    if cli.dry_run {
        log.log("Dry run: No files will be changed");
    }
    log.log(&rule_listing(&rules, flags));

    if cli.parse_only {
        return Ok(());
    }

    if cli.undo {
        if cli.root_paths.is_empty() {
            return Err(Error::Usage("--undo requires paths to process".to_string()));
        }
        let (restored, skipped) = undo_backups(
            &cli.root_paths,
            &rules,
            &backup_suffix,
            &include,
            &exclude,
            cli.dry_run,
            log,
        )?;
        if json_mode {
            println!(
                "{}",
                to_json(&UndoReport::new(cli.dry_run, restored, skipped))
            );
        } else {
            let action = if cli.dry_run {
                "Would restore"
            } else {
                "Restored"
            };
            log.log(&format!(
                "{action} {restored} file(s), skipped {skipped} with warnings"
            ));
        }
        return Ok(());
    }

    if cli.root_paths.is_empty() {
        return rewrite_stdin(cli, &rules, by_line, json_mode, log);
    }

    let options = RewriteOptions {
        do_renames: cli.renames || cli.full,
        do_contents: !cli.renames,
        include,
        exclude,
        backup_suffix,
        by_line,
        dry_run: cli.dry_run,
        strict: false,
    };
    let mut stats = Stats::default();
    rewrite_files(&cli.root_paths, &rules, &options, &mut stats, log)?;

    if json_mode {
        println!(
            "{}",
            to_json(&ReplaceReport::new(cli.dry_run, rules.len(), &stats))
        );
    } else {
        log.log(&format!(
            "Read {} files ({} bytes), found {} matches ({} skipped due to overlaps)",
            stats.files,
            stats.bytes,
            stats.valid_matches,
            stats.matches - stats.valid_matches
        ));
        let change_words = if cli.dry_run {
            "Dry run: Would have changed"
        } else {
            "Changed"
        };
        log.log(&format!(
            "{change_words} {} files ({} rewritten and {} renamed)",
            stats.files_changed, stats.files_rewritten, stats.renames
        ));
    }
    Ok(())
}

fn rewrite_stdin(
    cli: &Cli,
    rules: &[Rule],
    by_line: bool,
    json_mode: bool,
    log: &dyn Log,
) -> remold_core::Result<()> {
    if cli.renames || cli.full {
        return Err(Error::Usage(
            "can't rename on stdin; give filename arguments".to_string(),
        ));
    }
    if cli.dry_run {
        return Err(Error::Usage(
            "can't specify --dry-run on stdin; give filename arguments".to_string(),
        ));
    }
    if json_mode {
        return Err(Error::Usage(
            "can't specify --format=json on stdin; give filename arguments".to_string(),
        ));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = BufWriter::new(stdout.lock());
    let mut transform = |bytes: &[u8]| multi_replace(bytes, rules, None, log);
    let (counts, bytes_read) = transform_stream(&mut transform, &mut input, &mut output, by_line)
        .map_err(|e| Error::io("<stdin>", e))?;
    output.flush().map_err(|e| Error::io("<stdout>", e))?;

    log.log(&format!(
        "Read {bytes_read} bytes, made {} replacements ({} skipped due to overlaps)",
        counts.valid,
        counts.found - counts.valid
    ));
    Ok(())
}

fn rule_listing(rules: &[Rule], flags: RuleFlags) -> String {
    let mut flag_names = Vec::new();
    if flags.insensitive {
        flag_names.push("IGNORECASE");
    }
    if flags.dotall {
        flag_names.push("DOTALL");
    }
    let mut flags_str = flag_names.join("|");
    if !flags_str.is_empty() {
        flags_str.push(' ');
    }

    let mut out = format!("Using {} patterns:", rules.len());
    for rule in rules {
        out.push_str(&format!(
            "\n  '{}' {}-> '{}'",
            rule.pattern(),
            flags_str,
            rule.replacement.to_str_lossy()
        ));
    }
    out
}

fn log_skipped_backups(log: &dyn Log, skipped: usize, backup_suffix: &str) {
    if skipped > 0 {
        log.log(&format!(
            "Skipped {skipped} file(s) ending in '{backup_suffix}' (backup files are never processed)"
        ));
    }
}
