use super::settings::Settings;
use crate::kernel::split::METADATA_FILE;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_LINES_PER_FILE: usize = 500;

#[derive(Clone, Debug)]
pub struct SplitConfig {
    pub max_lines_per_file: usize,
    pub metadata_file_name: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_lines_per_file: DEFAULT_MAX_LINES_PER_FILE,
            metadata_file_name: METADATA_FILE.to_string(),
        }
    }
}

impl SplitConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_lines_per_file: settings.split.max_lines_per_file,
            ..Self::default()
        }
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines_per_file = max_lines;
        self
    }

    pub fn metadata_path(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(&self.metadata_file_name)
    }
}
