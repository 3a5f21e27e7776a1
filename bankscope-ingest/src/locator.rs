//! Resolve input paths (files or directories) into the set of statement PDFs.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collect every regular file ending in `.pdf` under `targets`.
///
/// Directories are walked to any depth with an explicit stack. Anything that
/// cannot be read is skipped. Paths are canonicalized so overlapping or
/// repeated targets never yield the same file twice.
pub fn locate_statements<I, P>(targets: I) -> BTreeSet<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut found = BTreeSet::new();
    let mut visited_dirs = HashSet::new();
    let mut pending: Vec<PathBuf> = targets
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .collect();

    while let Some(path) = pending.pop() {
        if path.is_file() {
            if has_pdf_suffix(&path) {
                debug!(path = %path.display(), "found statement");
                found.insert(canonical(&path));
            }
            continue;
        }

        if !path.is_dir() {
            debug!(path = %path.display(), "skipping: not a file or directory");
            continue;
        }

        // symlink loops
        if !visited_dirs.insert(canonical(&path)) {
            continue;
        }

        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries {
            match entry {
                Ok(entry) => pending.push(entry.path()),
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping unreadable entry")
                }
            }
        }
    }

    found
}

fn has_pdf_suffix(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(".pdf"))
        .unwrap_or(false)
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
