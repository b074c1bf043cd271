use std::path::PathBuf;

/// Raw file entry collected during scanning, before tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileEntry {
    /// Full path to the file or directory
    pub path: PathBuf,
    /// File size in bytes (0 for directories)
    pub size: u64,
    pub is_dir: bool,
}

impl RawFileEntry {
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            is_dir: true,
        }
    }
}

/// Progress updates emitted during scanning.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanProgress {
    Started { root: PathBuf },
    /// Periodic progress update
    Progress {
        files_scanned: u64,
        dirs_scanned: u64,
        total_bytes: u64,
    },
    Completed {
        total_files: u64,
        total_dirs: u64,
        total_bytes: u64,
        elapsed_ms: u64,
    },
    /// Non-fatal; the entry is skipped.
    Error { path: PathBuf, message: String },
}
