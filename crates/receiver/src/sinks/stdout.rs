use std::io::Write;

use super::AlertSink;
use crate::Result;

/// Writes each block to the process's standard output, separate from the
/// `tracing` log stream, so operators can tail it.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl AlertSink for StdoutSink {
    fn emit(&self, block: &str) -> Result<()> {
        // Hold the lock for the whole block so concurrent requests don't interleave.
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", block)?;
        out.flush()?;
        Ok(())
    }
}
