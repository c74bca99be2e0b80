//! Applies the embed rewrite to every markdown file under a notes directory.
//!
//! Each file is handled on its own: a file that cannot be read or written is
//! reported and skipped, and the walk carries on with the rest.

use crate::io::{self, IoError};
use crate::models::RewriteOptions;
use crate::rewrite::rewrite_text;
use relative_path::RelativePathBuf;
use std::io::{Stderr, Stdout, Write};
use std::path::Path;

/// Where a single file ended up after processing
#[derive(Debug)]
pub enum FileOutcome {
    /// No image embeds, nothing written
    Unchanged,
    /// Content replaced (or would have been, in a dry run)
    Rewritten { replacements: usize },
    Failed(IoError),
}

/// A file that was rewritten, relative to the notes root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenFile {
    pub relative_path: RelativePathBuf,
    pub replacements: usize,
}

#[derive(Debug, Default)]
pub struct ConversionSummary {
    pub files_scanned: usize,
    pub rewritten: Vec<RewrittenFile>,
    pub failures: Vec<IoError>,
}

impl ConversionSummary {
    pub fn links_converted(&self) -> usize {
        self.rewritten.iter().map(|file| file.replacements).sum()
    }

    pub fn files_unchanged(&self) -> usize {
        self.files_scanned - self.rewritten.len() - self.failed_files()
    }

    /// Failures tied to a markdown file, as opposed to unlistable directories
    pub fn failed_files(&self) -> usize {
        self.failures
            .iter()
            .filter(|failure| !matches!(failure, IoError::ListDir { .. }))
            .count()
    }
}

/// Receives the human-facing notices produced during a walk
pub trait Reporter {
    fn file_rewritten(&mut self, path: &Path, replacements: usize, dry_run: bool);
    fn file_failed(&mut self, error: &IoError);
    fn finished(&mut self, summary: &ConversionSummary);
}

/// Writes notices to an output stream and failures to a separate error stream
pub struct ConsoleReporter<O: Write, E: Write> {
    out: O,
    err: E,
}

impl ConsoleReporter<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn file_rewritten(&mut self, path: &Path, replacements: usize, dry_run: bool) {
        let verb = if dry_run { "Would rewrite" } else { "Rewrote" };
        let _ = writeln!(self.out, "{verb} {}", path.display());
        let _ = writeln!(
            self.out,
            "  -> converted {replacements} image link{}",
            if replacements == 1 { "" } else { "s" }
        );
    }

    fn file_failed(&mut self, error: &IoError) {
        let _ = writeln!(self.err, "Error: {error}");
    }

    fn finished(&mut self, summary: &ConversionSummary) {
        let _ = writeln!(
            self.out,
            "\nAll files processed: {} scanned, {} rewritten, {} failed.",
            summary.files_scanned,
            summary.rewritten.len(),
            summary.failed_files()
        );
    }
}

/// Rewrite a single markdown file in place
pub fn convert_file(path: &Path, options: &RewriteOptions) -> FileOutcome {
    convert_file_with(path, options, &mut io::write_file)
}

fn convert_file_with<W>(path: &Path, options: &RewriteOptions, write: &mut W) -> FileOutcome
where
    W: FnMut(&Path, &str) -> Result<(), IoError>,
{
    log::debug!("Visiting {}", path.display());

    let content = match io::read_file(path) {
        Ok(content) => content,
        Err(e) => return FileOutcome::Failed(e),
    };

    let result = rewrite_text(&content, options);
    if !result.needs_write() {
        return FileOutcome::Unchanged;
    }

    if !options.dry_run
        && let Err(e) = write(path, &result.new_text)
    {
        return FileOutcome::Failed(e);
    }

    FileOutcome::Rewritten {
        replacements: result.replacement_count,
    }
}

/// Walk `notes_root` and rewrite image embeds in every markdown file.
///
/// Only an invalid root is returned as an error; per-file failures are
/// reported and collected in the summary.
pub fn convert_directory(
    notes_root: &Path,
    options: &RewriteOptions,
    reporter: &mut dyn Reporter,
) -> Result<ConversionSummary, IoError> {
    convert_directory_with(notes_root, options, reporter, &mut io::write_file)
}

fn convert_directory_with<W>(
    notes_root: &Path,
    options: &RewriteOptions,
    reporter: &mut dyn Reporter,
    write: &mut W,
) -> Result<ConversionSummary, IoError>
where
    W: FnMut(&Path, &str) -> Result<(), IoError>,
{
    let scan = io::scan_markdown_files(notes_root)?;
    let mut summary = ConversionSummary::default();

    for error in scan.errors {
        log::warn!("{error}");
        reporter.file_failed(&error);
        summary.failures.push(error);
    }

    for path in scan.files {
        summary.files_scanned += 1;

        match convert_file_with(&path, options, write) {
            FileOutcome::Unchanged => {}
            FileOutcome::Rewritten { replacements } => {
                log::info!(
                    "Converted {replacements} image links in {}",
                    path.display()
                );
                reporter.file_rewritten(&path, replacements, options.dry_run);
                summary.rewritten.push(RewrittenFile {
                    relative_path: relative_to_root(&path, notes_root),
                    replacements,
                });
            }
            FileOutcome::Failed(error) => {
                log::warn!("{error}");
                reporter.file_failed(&error);
                summary.failures.push(error);
            }
        }
    }

    reporter.finished(&summary);
    Ok(summary)
}

fn relative_to_root(path: &Path, notes_root: &Path) -> RelativePathBuf {
    let relative = path.strip_prefix(notes_root).unwrap_or(path);
    RelativePathBuf::from_path(relative)
        .unwrap_or_else(|_| RelativePathBuf::from(relative.to_string_lossy().into_owned()))
}
