use super::config::DEFAULT_MAX_LINES_PER_FILE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub split: SplitSettings,
    /// 扩展名（含点，小写） -> 解释器
    #[serde(default = "default_runners")]
    pub runners: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitSettings {
    #[serde(default = "default_max_lines_per_file")]
    pub max_lines_per_file: usize,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            max_lines_per_file: DEFAULT_MAX_LINES_PER_FILE,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            split: SplitSettings::default(),
            runners: default_runners(),
        }
    }
}

fn default_max_lines_per_file() -> usize {
    DEFAULT_MAX_LINES_PER_FILE
}

pub fn default_runners() -> BTreeMap<String, String> {
    [(".py", "python"), (".js", "node"), (".ts", "ts-node")]
        .into_iter()
        .map(|(ext, program)| (ext.to_string(), program.to_string()))
        .collect()
}
