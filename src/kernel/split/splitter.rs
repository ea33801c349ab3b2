//! 按行数拆分文本
//!
//! 行 = 以 `\n` 分隔的片段（末尾的 `\n` 产生一个空行），每个分片内部用 `\n`
//! 连接，因此把所有分片再用 `\n` 连接即可逐字节还原原文。

use super::error::{Result, SplitError};
use super::metadata::MetadataStore;
use crate::kernel::services::ports::SplitConfig;
use memchr::memchr_iter;
use std::path::{Path, PathBuf};

pub const PART_EXTENSION: &str = "part";
const LINK_SUFFIX: &str = "_plink.ts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub original: PathBuf,
    pub parts: Vec<PlannedFile>,
    pub link: PlannedFile,
}

impl SplitPlan {
    pub fn part_paths(&self) -> Vec<PathBuf> {
        self.parts.iter().map(|p| p.path.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub original: PathBuf,
    pub parts: Vec<PathBuf>,
    pub link: PathBuf,
    /// false when the metadata file could not be written
    pub persisted: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Splitter {
    max_lines: usize,
}

impl Splitter {
    pub fn new(max_lines: usize) -> Result<Self> {
        if max_lines == 0 {
            return Err(SplitError::InvalidMaxLines(max_lines));
        }
        Ok(Self { max_lines })
    }

    pub fn from_config(config: &SplitConfig) -> Result<Self> {
        Self::new(config.max_lines_per_file)
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn plan(&self, original: &Path, text: &str) -> Result<SplitPlan> {
        let chunks = split_lines(text, self.max_lines)?;
        if chunks.is_empty() {
            return Err(SplitError::EmptyInput(original.to_path_buf()));
        }

        let parts: Vec<PlannedFile> = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| PlannedFile {
                path: part_path(original, i + 1),
                content: chunk.to_string(),
            })
            .collect();

        let part_paths: Vec<PathBuf> = parts.iter().map(|p| p.path.clone()).collect();
        let link = PlannedFile {
            path: link_path(original),
            content: link_content(&part_paths),
        };

        Ok(SplitPlan {
            original: original.to_path_buf(),
            parts,
            link,
        })
    }

    /// Writes every part in order plus the link file, then registers the
    /// parts with `store`. Nothing is written when a planned part already
    /// belongs to another original.
    pub fn split(
        &self,
        store: &mut MetadataStore,
        original: &Path,
        text: &str,
    ) -> Result<SplitOutcome> {
        let plan = self.plan(original, text)?;
        store.check_claim(&plan.original, &plan.part_paths())?;
        write_plan(&plan)?;
        let persisted = register(store, &plan);
        tracing::info!(
            original = %original.display(),
            parts = plan.parts.len(),
            max_lines = self.max_lines,
            "file split"
        );
        Ok(SplitOutcome {
            original: plan.original.clone(),
            parts: plan.part_paths(),
            link: plan.link.path.clone(),
            persisted,
        })
    }
}

pub fn write_plan(plan: &SplitPlan) -> Result<()> {
    for part in plan.parts.iter().chain(std::iter::once(&plan.link)) {
        std::fs::write(&part.path, &part.content)
            .map_err(|e| SplitError::part_write(&part.path, e))?;
        tracing::debug!(path = %part.path.display(), "split file written");
    }
    Ok(())
}

/// Returns whether the table reached disk. A failed save is logged and
/// otherwise ignored: the in-memory record is already in place.
pub fn register(store: &mut MetadataStore, plan: &SplitPlan) -> bool {
    match store.record(plan.original.clone(), plan.part_paths()) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "split registered in memory only");
            false
        }
    }
}

pub fn split_lines(text: &str, max_lines: usize) -> Result<Vec<&str>> {
    if max_lines == 0 {
        return Err(SplitError::InvalidMaxLines(max_lines));
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut chunks = Vec::with_capacity(line_count(text).div_ceil(max_lines));
    let mut start = 0;
    for (i, newline) in memchr_iter(b'\n', text.as_bytes()).enumerate() {
        if (i + 1) % max_lines == 0 {
            chunks.push(&text[start..newline]);
            start = newline + 1;
        }
    }
    chunks.push(&text[start..]);
    Ok(chunks)
}

pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    memchr_iter(b'\n', text.as_bytes()).count() + 1
}

/// `<dir>/<base>_p<NN>.part`, 1-based.
pub fn part_path(original: &Path, index: usize) -> PathBuf {
    let (dir, base) = dir_and_base(original);
    dir.join(format!("{}_p{:02}.{}", base, index, PART_EXTENSION))
}

pub fn link_path(original: &Path) -> PathBuf {
    let (dir, base) = dir_and_base(original);
    dir.join(format!("{}{}", base, LINK_SUFFIX))
}

fn dir_and_base(original: &Path) -> (PathBuf, String) {
    let dir = original
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let base = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (dir, base)
}

fn link_content(parts: &[PathBuf]) -> String {
    let imports = parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let name = part
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("// @ts-ignore\nimport part{} from './{}';", i + 1, name)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let names = (1..=parts.len())
        .map(|i| format!("part{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}\n\nexport default [{}];", imports, names)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/split/splitter.rs"]
mod tests;
