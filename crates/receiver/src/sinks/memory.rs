use std::sync::{Arc, Mutex};

use super::AlertSink;
use crate::Result;

/// Keeps emitted blocks in memory. Clones share the same buffer, so a test can
/// hand one clone to the server and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    blocks: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> Vec<String> {
        self.blocks
            .lock()
            .map(|blocks| blocks.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl AlertSink for MemorySink {
    fn emit(&self, block: &str) -> Result<()> {
        let mut blocks = self
            .blocks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        blocks.push(block.to_string());
        Ok(())
    }
}
