//! Service ports: pure contracts and data types.

pub mod config;
pub mod settings;

pub use config::{SplitConfig, DEFAULT_MAX_LINES_PER_FILE};
pub use settings::{default_runners, Settings, SplitSettings};
