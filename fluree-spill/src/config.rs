//! Spillover configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Default in-memory prefix: 1 MiB
pub const DEFAULT_MEMORY_LIMIT: usize = 1024 * 1024;

/// Default copy chunk: 64 KiB
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Controls how much of a response is held in memory before spilling
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct SpillConfig {
    /// Bytes read eagerly into memory
    pub memory_limit: usize,
    /// Directory for spill files; the system temp dir when unset
    pub temp_dir: Option<PathBuf>,
    /// Buffer size of the background copy
    pub chunk_size: usize,
}

impl Default for SpillConfig {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_LIMIT,
            temp_dir: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SpillConfig {
    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = limit;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }
}
