//! Async runtime adapter: loads combined views off the host loop and
//! sends the results back as messages.

mod message;
mod runtime;

pub use message::AppMessage;
pub use runtime::{read_combined, AsyncRuntime};
