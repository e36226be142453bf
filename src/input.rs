use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

/// Find the newest `<subdir>/<file_name>` under `root`, the layout the weekly
/// export folders use ("Feb. 9-14, 2026/source_code.txt"). Newest mtime wins;
/// equal mtimes break on path so re-runs stay deterministic.
pub fn find_latest(root: &Path, file_name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(root).ok()?;

    let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in entries.flatten() {
        let candidate = entry.path().join(file_name);
        if let Ok(meta) = fs::metadata(&candidate) {
            if meta.is_file() {
                let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                candidates.push((mtime, candidate));
            }
        }
    }

    candidates.sort_by(|a, b| b.cmp(a));
    candidates.into_iter().next().map(|(_, path)| path)
}

/// Dump exports are not reliably valid UTF-8; decode lossily rather than fail.
pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn read_strict(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

// ── Tests ──
