//! Find "missing entries" ledgers below a root directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ledger::MISSING_FILE_NAME;

/// All `MISSING_FILE_NAME` files under `root` (recursive), sorted by path.
/// Unreadable subdirectories are logged and skipped; an unreadable root is an error.
pub fn find_missing_ledgers(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    let mut is_root = true;

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) if is_root => {
                return Err(e).with_context(|| format!("read dir: {}", dir.display()));
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "skipping unreadable directory: {}", e);
                continue;
            }
        };
        is_root = false;

        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && entry.file_name() == MISSING_FILE_NAME {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::COMPLETE_FILE_NAME;
    use tempfile::tempdir;

    #[test]
    fn finds_nested_missing_ledgers_only() {
        let root = tempdir().unwrap();
        let a = root.path().join("Modulo 1");
        let b = root.path().join("curso").join("Modulo 2");
        let c = root.path().join("Modulo 3");
        for d in [&a, &b, &c] {
            fs::create_dir_all(d).unwrap();
        }
        fs::write(a.join(MISSING_FILE_NAME), "x").unwrap();
        fs::write(b.join(MISSING_FILE_NAME), "x").unwrap();
        fs::write(c.join(COMPLETE_FILE_NAME), "x").unwrap();

        let found = find_missing_ledgers(root.path()).unwrap();
        let mut expected = vec![a.join(MISSING_FILE_NAME), b.join(MISSING_FILE_NAME)];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn missing_root_is_error() {
        assert!(find_missing_ledgers(Path::new("/nonexistent/coursedl-root")).is_err());
    }
}
