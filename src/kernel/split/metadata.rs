//! 拆分元数据
//!
//! 维护 原始文件 -> 有序分片列表 的映射，持久化到工作区根目录下的
//! `.code-split-metadata.json`。加载失败视为空表，每次修改后同步写盘。

use super::error::{Result, SplitError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const METADATA_FILE: &str = ".code-split-metadata.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRecord {
    pub original_file: PathBuf,
    /// 拼接顺序即还原顺序
    pub parts: Vec<PathBuf>,
}

pub type SplitTable = BTreeMap<PathBuf, SplitRecord>;

#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    records: SplitTable,
    generation: u64,
}

impl MetadataStore {
    pub fn load(workspace_root: &Path) -> Self {
        Self::load_from(workspace_root.join(METADATA_FILE))
    }

    pub fn load_from(path: PathBuf) -> Self {
        let records = match read_table(&path) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "split metadata unreadable, starting empty"
                );
                SplitTable::new()
            }
        };
        tracing::debug!(path = %path.display(), records = records.len(), "split metadata loaded");
        Self {
            path,
            records,
            generation: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bumped on every structural change; derived state compares against it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replaces any previous record for `original`, then persists the table.
    /// `NoParts` and `PartOwned` leave the table untouched; a `Storage` error
    /// only means the file on disk is stale.
    pub fn record(&mut self, original: PathBuf, parts: Vec<PathBuf>) -> Result<()> {
        if parts.is_empty() {
            return Err(SplitError::NoParts(original));
        }
        self.check_claim(&original, &parts)?;

        let record = SplitRecord {
            original_file: original.clone(),
            parts,
        };
        self.records.insert(original, record);
        self.generation += 1;
        self.save()
    }

    pub fn remove(&mut self, original: &Path) -> Result<Option<SplitRecord>> {
        let Some(removed) = self.records.remove(original) else {
            return Ok(None);
        };
        self.generation += 1;
        self.save()?;
        Ok(Some(removed))
    }

    pub fn lookup_parts(&self, original: &Path) -> Option<&[PathBuf]> {
        self.records.get(original).map(|r| r.parts.as_slice())
    }

    pub fn find_owner(&self, part: &Path) -> Result<Option<&Path>> {
        let mut owners = self
            .records
            .iter()
            .filter(|(_, record)| record.parts.iter().any(|p| p == part))
            .map(|(original, _)| original.as_path());

        let Some(first) = owners.next() else {
            return Ok(None);
        };
        let rest: Vec<&Path> = owners.collect();
        if rest.is_empty() {
            return Ok(Some(first));
        }

        let mut all = vec![first.to_path_buf()];
        all.extend(rest.into_iter().map(Path::to_path_buf));
        Err(SplitError::AmbiguousOwner {
            part: part.to_path_buf(),
            owners: all,
        })
    }

    /// Fails if any of `parts` is already registered under another original.
    pub fn check_claim(&self, original: &Path, parts: &[PathBuf]) -> Result<()> {
        for part in parts {
            let owner = self
                .records
                .iter()
                .find(|(other, record)| other.as_path() != original && record.parts.contains(part));
            if let Some((owner, _)) = owner {
                return Err(SplitError::PartOwned {
                    part: part.clone(),
                    owner: owner.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn all_records(&self) -> SplitTable {
        self.records.clone()
    }

    pub fn save(&self) -> Result<()> {
        let write = || -> std::result::Result<(), String> {
            let data = serde_json::to_string_pretty(&self.records).map_err(|e| e.to_string())?;
            std::fs::write(&self.path, data).map_err(|e| e.to_string())
        };

        write().map_err(|message| {
            tracing::error!(path = %self.path.display(), error = %message, "saving split metadata failed");
            SplitError::storage(&self.path, message)
        })
    }
}

fn read_table(path: &Path) -> std::result::Result<SplitTable, String> {
    if !path.exists() {
        return Ok(SplitTable::new());
    }
    let data = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut table: SplitTable = serde_json::from_str(&data).map_err(|e| e.to_string())?;
    table.retain(|original, record| {
        if record.parts.is_empty() {
            tracing::warn!(original = %original.display(), "dropping split record without parts");
            return false;
        }
        true
    });
    Ok(table)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/split/metadata.rs"]
mod tests;
