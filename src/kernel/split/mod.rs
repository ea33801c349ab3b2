//! Split bookkeeping: metadata store, line-based splitter, combiner.

pub mod combiner;
pub mod error;
pub mod metadata;
pub mod splitter;

pub use combiner::{
    combine, join_trimmed, read_parts, resolve, resolve_original, unique_output_path, write_new,
    CombineOutcome,
};
pub use error::{Result, SplitError};
pub use metadata::{MetadataStore, SplitRecord, SplitTable, METADATA_FILE};
pub use splitter::{
    line_count, link_path, part_path, split_lines, write_plan, PlannedFile, SplitOutcome,
    SplitPlan, Splitter, PART_EXTENSION,
};
