use crate::error::{Error, Result};
use crate::replace::MatchCounts;
use crate::rewrite::Stats;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Default suffix for backups of modified files. Must begin with `.`.
pub const BACKUP_SUFFIX: &str = ".orig";
/// Suffix for in-flight temp files; never user-visible on success.
pub const TEMP_SUFFIX: &str = ".remold.tmp";

/// A content transformer: input bytes in, output bytes plus match counts out.
pub type Transform<'a> = &'a mut dyn FnMut(&[u8]) -> (Vec<u8>, MatchCounts);

/// Ensure the parent directories of a file exist.
pub fn make_parent_dirs(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    Ok(())
}

/// Move a file. Without `clobber`, an occupied destination gets a numeric
/// suffix (`.1`, `.2`, ...); an existing numeric suffix is stripped first so
/// suffixes stay flat instead of accumulating.
pub fn move_file(source_path: &str, dest_path: &str, clobber: bool) -> Result<()> {
    let mut dest = dest_path.to_string();
    if !clobber {
        let mut i = 1;
        while Path::new(&dest).exists() {
            if let Some((stem, suffix)) = dest.rsplit_once('.') {
                if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
                    dest = stem.to_string();
                }
            }
            dest = format!("{dest}.{i}");
            i += 1;
        }
    }
    fs::rename(source_path, &dest).map_err(|e| Error::io(source_path, e))
}

/// Transform a stream of bytes, either line by line or at once in memory.
///
/// Returns the accumulated match counts and the number of bytes read. In line
/// mode the `\n` terminator is part of each chunk handed to the transformer,
/// so matches cannot span lines.
pub fn transform_stream<R: BufRead + ?Sized, W: Write + ?Sized>(
    transform: Transform<'_>,
    input: &mut R,
    output: &mut W,
    by_line: bool,
) -> std::io::Result<(MatchCounts, u64)> {
    let mut counts = MatchCounts::default();
    let mut bytes_read: u64 = 0;
    if by_line {
        let mut line = Vec::new();
        loop {
            line.clear();
            let n = input.read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }
            bytes_read += n as u64;
            let (out, line_counts) = transform(&line);
            counts.add(line_counts);
            output.write_all(&out)?;
        }
    } else {
        let mut contents = Vec::new();
        input.read_to_end(&mut contents)?;
        bytes_read = contents.len() as u64;
        let (out, whole_counts) = transform(&contents);
        counts.add(whole_counts);
        output.write_all(&out)?;
    }
    Ok((counts, bytes_read))
}

/// Transform the file at `source_path` into `dest_path` (possibly the same
/// path), atomically and with a backup.
///
/// With a transformer, the output is written to `dest_path + TEMP_SUFFIX`
/// with the source's permissions; only once that succeeds (and only outside
/// dry-run, when the path changed or matches were found) is the source moved
/// aside to `source_path + backup_suffix` and the temp moved into place. The
/// original is never unlinked before its replacement is fully written.
/// Without a transformer, the file is renamed only, with no backup: the
/// original content still exists under the new name.
pub fn transform_file(
    transform: Option<Transform<'_>>,
    source_path: &str,
    dest_path: &str,
    backup_suffix: &str,
    by_line: bool,
    dry_run: bool,
    stats: &mut Stats,
) -> Result<MatchCounts> {
    let mut counts = MatchCounts::default();
    let mut changed = false;

    if let Some(transform) = transform {
        let backup_path = format!("{source_path}{backup_suffix}");
        let temp_path = format!("{dest_path}{TEMP_SUFFIX}");
        make_parent_dirs(&temp_path)?;

        let source = File::open(source_path).map_err(|e| Error::io(source_path, e))?;
        let metadata = source.metadata().map_err(|e| Error::io(source_path, e))?;
        let mut reader = BufReader::new(source);

        let written = write_temp(transform, &mut reader, &temp_path, by_line);
        let (stream_counts, bytes_read) = match written {
            Ok(result) => result,
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(Error::io(source_path, e));
            },
        };
        counts = stream_counts;
        stats.bytes += bytes_read;

        if let Err(e) = fs::set_permissions(&temp_path, metadata.permissions()) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::io(temp_path, e));
        }

        // The tallies above are collected even in dry-run mode; the original
        // file is only touched once the temp write has fully succeeded.
        if !dry_run && (dest_path != source_path || counts.found > 0) {
            if let Err(e) = move_file(source_path, &backup_path, true)
                .and_then(|()| move_file(&temp_path, dest_path, false))
            {
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
        } else {
            fs::remove_file(&temp_path).map_err(|e| Error::io(&*temp_path, e))?;
        }

        stats.files += 1;
        if counts.found > 0 {
            stats.files_rewritten += 1;
            changed = true;
        }
        if dest_path != source_path {
            stats.renames += 1;
            changed = true;
        }
    } else if dest_path != source_path {
        if !dry_run {
            make_parent_dirs(dest_path)?;
            move_file(source_path, dest_path, false)?;
        }
        stats.files += 1;
        stats.renames += 1;
        changed = true;
    }

    if changed {
        stats.files_changed += 1;
    }
    Ok(counts)
}

fn write_temp<R: BufRead + ?Sized>(
    transform: Transform<'_>,
    reader: &mut R,
    temp_path: &str,
    by_line: bool,
) -> std::io::Result<(MatchCounts, u64)> {
    let temp = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)?;
    let mut writer = BufWriter::new(temp);
    let result = transform_stream(transform, reader, &mut writer, by_line)?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(result)
}
