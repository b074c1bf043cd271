use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::{bail, Result};
use jwalk::WalkDir;

use super::types::{RawFileEntry, ScanProgress};

/// How many entries between two `Progress` messages.
const PROGRESS_EVERY: u64 = 10_000;

/// Walk `root` recursively and collect every file and directory below it.
///
/// Symlinks are not followed. Entries that cannot be read are reported
/// through `progress_tx` and skipped. The root itself is not included.
pub fn scan_walkdir(root: &Path, progress_tx: Option<&mpsc::Sender<ScanProgress>>) -> Result<Vec<RawFileEntry>> {
    if !root.is_dir() {
        bail!("not a directory: {}", root.display());
    }

    let send = |msg: ScanProgress| {
        if let Some(tx) = progress_tx {
            let _ = tx.send(msg);
        }
    };

    let start = Instant::now();
    send(ScanProgress::Started {
        root: root.to_path_buf(),
    });
    tracing::info!("Scanning {}", root.display());

    let mut entries = Vec::new();
    let (mut files, mut dirs, mut bytes) = (0u64, 0u64, 0u64);

    for result in WalkDir::new(root).skip_hidden(false).follow_links(false).sort(true) {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                tracing::warn!("Skipping unreadable entry {}: {}", path.display(), e);
                send(ScanProgress::Error {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if entry.depth == 0 {
            continue;
        }

        let path = entry.path();
        if entry.file_type().is_dir() {
            dirs += 1;
            entries.push(RawFileEntry::dir(path));
        } else {
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    tracing::warn!("No metadata for {}: {}", path.display(), e);
                    send(ScanProgress::Error {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                    0
                }
            };
            files += 1;
            bytes += size;
            entries.push(RawFileEntry::file(path, size));
        }

        if (files + dirs) % PROGRESS_EVERY == 0 {
            send(ScanProgress::Progress {
                files_scanned: files,
                dirs_scanned: dirs,
                total_bytes: bytes,
            });
        }
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Scan complete: {} files, {} dirs, {} bytes in {}ms",
        files,
        dirs,
        bytes,
        elapsed_ms
    );
    send(ScanProgress::Completed {
        total_files: files,
        total_dirs: dirs,
        total_bytes: bytes,
        elapsed_ms,
    });

    Ok(entries)
}
