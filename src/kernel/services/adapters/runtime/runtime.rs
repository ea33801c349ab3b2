use super::message::AppMessage;
use crate::kernel::virtual_doc::{join_raw, CombinedUri};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
}

impl AsyncRuntime {
    pub fn new(tx: Sender<AppMessage>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self { runtime, tx })
    }

    /// Reads the live parts off the caller thread and posts the combined
    /// view as `CombinedContent`.
    pub fn load_combined(&self, uri: CombinedUri, parts: Vec<PathBuf>) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let content = read_combined(&parts).await;
            let _ = tx.send(AppMessage::CombinedContent { uri, content });
        });
    }
}

/// Raw newline join of the live part contents; an unreadable part
/// contributes an empty string.
pub async fn read_combined(parts: &[PathBuf]) -> String {
    let mut contents = Vec::with_capacity(parts.len());
    for part in parts {
        match tokio::fs::read_to_string(part).await {
            Ok(content) => contents.push(content),
            Err(e) => {
                tracing::warn!(part = %part.display(), error = %e, "part unreadable, showing it empty");
                contents.push(String::new());
            }
        }
    }
    join_raw(&contents)
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/runtime.rs"]
mod tests;
