//! Trimming of Unix mbox files.
//!
//! A message starts at every line whose first five bytes are `From `. Lines
//! are read as raw bytes, so mailboxes that are not valid UTF-8 are copied
//! unchanged.

use crate::domain::model::TrimReport;
use crate::utils::error::Result;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const MESSAGE_DELIMITER: &[u8] = b"From ";

fn is_delimiter(line: &[u8]) -> bool {
    line.starts_with(MESSAGE_DELIMITER)
}

/// Count the messages in `reader`.
pub fn count_messages<R: BufRead>(mut reader: R) -> Result<usize> {
    let mut count = 0;
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if is_delimiter(&line) {
            count += 1;
        }
    }
    Ok(count)
}

/// Skip the first `remove` messages and copy the rest to `writer`.
///
/// Anything before the first message that is kept is dropped, including a
/// preamble ahead of the very first delimiter. Returns the number of bytes
/// written.
pub fn copy_recent<R: BufRead, W: Write>(mut reader: R, writer: &mut W, remove: usize) -> Result<u64> {
    let mut remaining = remove;
    let mut copying = false;
    let mut written = 0u64;
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if !copying && is_delimiter(&line) {
            if remaining > 0 {
                remaining -= 1;
                continue;
            }
            copying = true;
        }
        if copying {
            writer.write_all(&line)?;
            written += line.len() as u64;
        }
    }

    Ok(written)
}

/// Count the messages in the mailbox file at `path`.
pub fn count_mailbox(path: &Path) -> Result<usize> {
    count_messages(BufReader::new(File::open(path)?))
}

/// Trim the mailbox at `path` down to its `keep` most recent messages.
///
/// Symlinks are followed, so the mailbox they point at is the one trimmed.
/// The trimmed copy is written next to the mailbox and renamed over it, so a
/// failure part way leaves the original intact. When the mailbox directory
/// is not writable (a mail spool, typically) the file is rewritten in place
/// instead. With `dry_run` nothing is written.
pub fn trim_mailbox(path: &Path, keep: usize, dry_run: bool) -> Result<TrimReport> {
    let target = std::fs::canonicalize(path)?;
    let total = count_mailbox(&target)?;
    tracing::debug!("{} holds {} messages", target.display(), total);

    if total <= keep {
        return Ok(TrimReport::untouched(total));
    }

    let report = TrimReport {
        total,
        kept: keep,
        removed: total - keep,
    };
    if dry_run {
        tracing::info!("Dry run: would remove {} messages from {}", report.removed, target.display());
        return Ok(report);
    }

    let dir = target.parent().unwrap_or_else(|| Path::new("/"));
    match NamedTempFile::new_in(dir) {
        Ok(temp) => replace_atomically(&target, temp, report.removed)?,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            tracing::debug!("{} is not writable, rewriting in place", dir.display());
            rewrite_in_place(&target, report.removed)?;
        }
        Err(e) => return Err(e.into()),
    }
    tracing::info!("Trimmed {} to {} messages", target.display(), keep);

    Ok(report)
}

fn replace_atomically(target: &Path, mut temp: NamedTempFile, remove: usize) -> Result<()> {
    let file = File::open(target)?;
    let written = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let written = copy_recent(BufReader::new(&file), &mut writer, remove)?;
        writer.flush()?;
        written
    };
    tracing::debug!("Wrote {} bytes to {}", written, temp.path().display());
    temp.as_file().sync_all()?;
    temp.as_file().set_permissions(file.metadata()?.permissions())?;
    drop(file);

    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Trim the mailbox at `target` by truncating and rewriting the file itself.
///
/// The kept messages are staged in an anonymous temporary file first, so the
/// mailbox is only truncated once they have been read in full. The inode,
/// owner and permissions of the mailbox are unchanged.
pub fn rewrite_in_place(target: &Path, remove: usize) -> Result<u64> {
    let mut staged = tempfile::tempfile()?;
    {
        let source = File::open(target)?;
        let mut writer = BufWriter::new(&mut staged);
        copy_recent(BufReader::new(source), &mut writer, remove)?;
        writer.flush()?;
    }
    staged.seek(SeekFrom::Start(0))?;

    let mut mailbox = OpenOptions::new().write(true).truncate(true).open(target)?;
    let written = std::io::copy(&mut staged, &mut mailbox)?;
    mailbox.sync_all()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn mailbox(messages: usize) -> Vec<u8> {
        let mut data = Vec::new();
        for i in 1..=messages {
            data.extend_from_slice(
                format!(
                    "From sender{i}@example.com Mon Jan  1 00:00:00 2024\n\
                     Subject: message {i}\n\
                     \n\
                     >From the desk of number {i}\n\
                     \n"
                )
                .as_bytes(),
            );
        }
        data
    }

    #[test]
    fn test_count_messages() {
        assert_eq!(count_messages(Cursor::new(mailbox(10))).unwrap(), 10);
        assert_eq!(count_messages(Cursor::new(Vec::new())).unwrap(), 0);
    }

    #[test]
    fn test_quoted_from_is_not_a_delimiter() {
        let data = b"From a@b Mon\n>From quoted\n From indented\nFrom: header\n";
        assert_eq!(count_messages(Cursor::new(&data[..])).unwrap(), 1);
    }

    #[test]
    fn test_copy_recent_keeps_the_tail() {
        let data = mailbox(5);
        let mut out = Vec::new();
        copy_recent(Cursor::new(&data), &mut out, 3).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(count_messages(Cursor::new(text.as_bytes())).unwrap(), 2);
        assert!(text.starts_with("From sender4@example.com"));
        assert!(text.contains("Subject: message 5"));
        assert!(!text.contains("Subject: message 3"));
    }

    #[test]
    fn test_preamble_is_dropped() {
        let data = b"preamble line\nFrom a@b\nbody a\nFrom c@d\nbody c\n";
        let mut out = Vec::new();
        copy_recent(Cursor::new(&data[..]), &mut out, 0).unwrap();
        assert_eq!(out, b"From a@b\nbody a\nFrom c@d\nbody c\n");
    }

    #[test]
    fn test_non_utf8_bytes_survive() {
        let data = b"From a@b\n\xff\xfe old\nFrom c@d\n\xe9t\xe9\n";
        let mut out = Vec::new();
        copy_recent(Cursor::new(&data[..]), &mut out, 1).unwrap();
        assert_eq!(out, b"From c@d\n\xe9t\xe9\n");
    }

    #[test]
    fn test_remove_everything() {
        let data = mailbox(4);
        let mut out = Vec::new();
        assert_eq!(copy_recent(Cursor::new(&data), &mut out, 4).unwrap(), 0);
        assert!(out.is_empty());
    }
}
