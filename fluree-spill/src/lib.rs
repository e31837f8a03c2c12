//! Bounded-memory spillover stream
//!
//! Protects a fast producer (typically a server streaming a large response)
//! from a slow consumer without holding the whole payload in memory:
//!
//! 1. Up to [`SpillConfig::memory_limit`] bytes are read eagerly.
//! 2. If the source is not exhausted by then, a task on the shared pool
//!    copies the rest into a temporary file as fast as the source allows.
//! 3. The consumer reads the memory prefix, then follows the file, blocking
//!    only until the bytes it needs have been written.
//!
//! The temporary file is removed once both the copy task and the reader are
//! done with it.

mod config;
mod stream;

pub use config::{SpillConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MEMORY_LIMIT};
pub use stream::{spill_pool, SpillStream};
