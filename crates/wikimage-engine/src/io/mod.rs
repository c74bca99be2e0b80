use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Document extension the walker looks for
pub const MARKDOWN_SUFFIX: &str = ".md";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Invalid notes directory {path}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to list directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl IoError {
    /// Path the failure relates to
    pub fn path(&self) -> &Path {
        match self {
            IoError::InvalidRoot { path, .. }
            | IoError::Read { path, .. }
            | IoError::Write { path, .. }
            | IoError::ListDir { path, .. } => path,
        }
    }
}

/// Markdown files found under a root, plus any directories that could not be listed
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<PathBuf>,
    pub errors: Vec<IoError>,
}

/// Read a markdown file as UTF-8
pub fn read_file(path: &Path) -> Result<String, IoError> {
    fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the full content of an existing file.
///
/// Never creates a file: a path that vanished since it was read is an error.
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    let to_write_error = |source| IoError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(to_write_error)?;
    file.write_all(content.as_bytes()).map_err(to_write_error)?;
    file.flush().map_err(to_write_error)
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() {
        return Err(IoError::InvalidRoot {
            path: path.to_path_buf(),
            reason: "directory does not exist".to_string(),
        });
    }
    if !path.is_dir() {
        return Err(IoError::InvalidRoot {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(())
}

/// Scan for markdown files in the notes directory.
///
/// Unreadable sub-directories are collected as errors rather than aborting the scan.
pub fn scan_markdown_files(notes_root: &Path) -> Result<ScanResult, IoError> {
    validate_notes_dir(notes_root)?;

    let mut result = ScanResult::default();
    scan_directory_recursive(notes_root, &mut result);
    result.files.sort();
    Ok(result)
}

/// Raw name test, so names that are not valid UTF-8 still qualify
pub fn is_markdown_file_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().ends_with(MARKDOWN_SUFFIX.as_bytes())
}

fn scan_directory_recursive(dir: &Path, result: &mut ScanResult) {
    let to_list_error = |source| IoError::ListDir {
        path: dir.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            result.errors.push(to_list_error(source));
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                result.errors.push(to_list_error(source));
                continue;
            }
        };
        let path = entry.path();

        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        // Symlinked directories are neither followed nor read
        let is_linked_dir = file_type.is_symlink() && path.is_dir();
        if file_type.is_dir() {
            scan_directory_recursive(&path, result);
        } else if !is_linked_dir && is_markdown_file_name(&entry.file_name()) {
            result.files.push(path);
        }
    }
}
