pub mod memory;
pub mod stdout;

pub use memory::MemorySink;
pub use stdout::StdoutSink;

use crate::Result;

/// Destination for formatted alert blocks.
#[cfg_attr(test, mockall::automock)]
pub trait AlertSink: Send + Sync {
    fn emit(&self, block: &str) -> Result<()>;
}
