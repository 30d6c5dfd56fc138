//! Recursive file discovery.

use std::io;
use std::path::{Path, PathBuf};

/// Returns every file below `dir` accepted by `filter`, sorted by path.
pub fn find_files<F>(dir: &Path, filter: F) -> io::Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if filter(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}
