//! 运行合并结果：按扩展名选择解释器

use crate::kernel::services::ports::{default_runners, Settings};
use crate::kernel::split::{Result, SplitError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    pub program: String,
    pub path: PathBuf,
}

impl RunCommand {
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(&self.path);
        command
    }
}

impl std::fmt::Display for RunCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} \"{}\"", self.program, self.path.display())
    }
}

#[derive(Debug, Clone)]
pub struct RunnerTable {
    runners: BTreeMap<String, String>,
}

impl Default for RunnerTable {
    fn default() -> Self {
        Self::new(default_runners())
    }
}

impl RunnerTable {
    /// Keys are extensions with the leading dot; matching is case-insensitive.
    pub fn new(runners: BTreeMap<String, String>) -> Self {
        let runners = runners
            .into_iter()
            .map(|(ext, program)| (ext.to_ascii_lowercase(), program))
            .collect();
        Self { runners }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.runners.clone())
    }

    pub fn command_for(&self, path: &Path) -> Result<RunCommand> {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
            .unwrap_or_default();
        let program = self
            .runners
            .get(&ext)
            .ok_or(SplitError::UnsupportedFileType(ext))?;
        Ok(RunCommand {
            program: program.clone(),
            path: path.to_path_buf(),
        })
    }

    /// Runs the file in a child process attached to the current terminal.
    pub fn run(&self, path: &Path) -> Result<ExitStatus> {
        let run = self.command_for(path)?;
        tracing::info!(command = %run, "running combined file");
        run.to_command()
            .status()
            .map_err(|e| SplitError::Launch {
                program: run.program.clone(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/runner.rs"]
mod tests;
