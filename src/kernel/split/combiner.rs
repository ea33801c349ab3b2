//! 合并分片
//!
//! 合并结果总是写入一个新文件，不会覆盖已有文件，也不会改动原文件和分片。

use super::error::{Result, SplitError};
use super::metadata::MetadataStore;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineOutcome {
    pub original: PathBuf,
    pub path: PathBuf,
    pub parts: usize,
}

/// `input` may be the original itself or one of its parts.
pub fn resolve_original(store: &MetadataStore, input: &Path) -> Result<PathBuf> {
    Ok(store
        .find_owner(input)?
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.to_path_buf()))
}

pub fn resolve(store: &MetadataStore, input: &Path) -> Result<(PathBuf, Vec<PathBuf>)> {
    let original = resolve_original(store, input)?;
    let parts = store
        .lookup_parts(&original)
        .ok_or_else(|| SplitError::NotSplit(original.clone()))?
        .to_vec();
    Ok((original, parts))
}

pub fn combine(store: &MetadataStore, input: &Path) -> Result<CombineOutcome> {
    let (original, parts) = resolve(store, input)?;
    let contents = read_parts(&parts)?;
    let combined = join_trimmed(&contents);

    let path = unique_output_path(&original);
    write_new(&path, &combined)?;
    tracing::info!(
        original = %original.display(),
        output = %path.display(),
        parts = parts.len(),
        "parts combined"
    );
    Ok(CombineOutcome {
        original,
        path,
        parts: parts.len(),
    })
}

/// All-or-nothing: the first unreadable part aborts the merge.
pub fn read_parts(parts: &[PathBuf]) -> Result<Vec<String>> {
    parts
        .iter()
        .map(|part| std::fs::read_to_string(part).map_err(|e| SplitError::part_read(part, e)))
        .collect()
}

pub fn join_trimmed<S: AsRef<str>>(contents: &[S]) -> String {
    contents
        .iter()
        .map(|c| c.as_ref().trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// First of `<base><ext>`, `<base>_01<ext>`, `<base>_02<ext>`, ... that does
/// not exist yet. Pure function of the file system state.
pub fn unique_output_path(original: &Path) -> PathBuf {
    if !original.exists() {
        return original.to_path_buf();
    }

    let dir = original.parent().map(Path::to_path_buf).unwrap_or_default();
    let base = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = original
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter: usize = 1;
    loop {
        let candidate = dir.join(format!("{}_{:02}{}", base, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

pub fn write_new(path: &Path, content: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                SplitError::OutputExists(path.to_path_buf())
            } else {
                SplitError::part_write(path, e)
            }
        })?;
    file.write_all(content.as_bytes())
        .map_err(|e| SplitError::part_write(path, e))
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/split/combiner.rs"]
mod tests;
