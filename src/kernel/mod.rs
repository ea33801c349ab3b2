//! Split/combine kernel: bookkeeping, combined view, runner, service adapters.

pub mod runner;
pub mod services;
pub mod split;
pub mod virtual_doc;

pub use runner::{RunCommand, RunnerTable};
pub use split::{MetadataStore, SplitError, SplitRecord, Splitter};
pub use virtual_doc::{ChangeSubscription, CombinedDocumentProvider, CombinedUri};
