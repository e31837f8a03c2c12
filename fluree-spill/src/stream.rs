//! Spillover stream implementation

use crate::config::SpillConfig;
use parking_lot::{Condvar, Mutex};
use std::fs::File;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempPath;

/// Terminal state of the background copy is explicit; the byte counter is
/// never overloaded to mean "done".
#[derive(Debug)]
enum CopyState {
    Writing,
    Completed,
    Failed { kind: io::ErrorKind, message: String },
}

#[derive(Debug)]
struct Progress {
    /// Bytes durably handed to the spill file
    written: u64,
    state: CopyState,
}

/// State shared between the reader and the copy task
struct Shared {
    progress: Mutex<Progress>,
    signal: Condvar,
    /// Reader asked the copy to stop early
    stop: AtomicBool,
    reader_closed: AtomicBool,
    writer_closed: AtomicBool,
    temp_path: Mutex<Option<TempPath>>,
}

impl Shared {
    fn new(path: TempPath) -> Self {
        Self {
            progress: Mutex::new(Progress {
                written: 0,
                state: CopyState::Writing,
            }),
            signal: Condvar::new(),
            stop: AtomicBool::new(false),
            reader_closed: AtomicBool::new(false),
            writer_closed: AtomicBool::new(false),
            temp_path: Mutex::new(Some(path)),
        }
    }

    fn release_reader(&self) {
        self.reader_closed.store(true, Ordering::SeqCst);
        self.remove_if_unused();
    }

    fn release_writer(&self) {
        self.writer_closed.store(true, Ordering::SeqCst);
        self.remove_if_unused();
    }

    /// Delete the spill file once both sides are closed. Whichever side
    /// closes last does the work; the `Option::take` makes it happen once.
    fn remove_if_unused(&self) {
        if self.reader_closed.load(Ordering::SeqCst) && self.writer_closed.load(Ordering::SeqCst) {
            if let Some(path) = self.temp_path.lock().take() {
                let path_str = path.display().to_string();
                match path.close() {
                    Ok(()) => tracing::trace!(path = %path_str, "spill file removed"),
                    Err(e) => tracing::warn!(path = %path_str, error = %e, "failed to remove spill file"),
                }
            }
        }
    }

    fn finish(&self, state: CopyState) {
        self.progress.lock().state = state;
        self.signal.notify_all();
    }
}

/// Build the worker pool that runs background copies
pub fn spill_pool(threads: usize) -> io::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("fluree-spill-{}", i))
        .build()
        .map_err(io::Error::other)
}

struct SpillReader {
    file: File,
    /// Bytes of the spill file already returned
    pos: u64,
    shared: Arc<Shared>,
}

/// A [`Read`] over a source that holds at most a bounded prefix in memory.
///
/// Bytes are returned exactly in source order. A failure of the background
/// copy is raised to the reader after every byte written before it has been
/// delivered.
pub struct SpillStream {
    memory: Vec<u8>,
    mem_pos: usize,
    spill: Option<SpillReader>,
    closed: bool,
}

impl SpillStream {
    /// Wrap `source`, reading the in-memory prefix synchronously.
    ///
    /// If the source has more than `memory_limit` bytes, the remainder is
    /// copied to a temporary file by a task on `pool`.
    pub fn new(
        mut source: Box<dyn Read + Send>,
        config: &SpillConfig,
        pool: &rayon::ThreadPool,
    ) -> io::Result<Self> {
        let mut memory = Vec::with_capacity(config.memory_limit.min(64 * 1024));
        (&mut source)
            .take(config.memory_limit as u64)
            .read_to_end(&mut memory)?;

        if memory.len() < config.memory_limit {
            tracing::trace!(bytes = memory.len(), "source fits in memory");
            return Ok(Self {
                memory,
                mem_pos: 0,
                spill: None,
                closed: false,
            });
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("fluree-spill-");
        let named = match &config.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let read_file = named.reopen()?;
        let (write_file, path) = named.into_parts();
        tracing::debug!(
            memory_limit = config.memory_limit,
            path = %path.display(),
            "response exceeds memory limit, spilling to disk"
        );

        let shared = Arc::new(Shared::new(path));
        let chunk_size = config.chunk_size.max(1);
        let task_shared = Arc::clone(&shared);
        pool.spawn(move || copy_to_file(source, write_file, chunk_size, task_shared));

        Ok(Self {
            memory,
            mem_pos: 0,
            spill: Some(SpillReader {
                file: read_file,
                pos: 0,
                shared,
            }),
            closed: false,
        })
    }

    /// Whether part of the source went to a temporary file
    pub fn is_spilled(&self) -> bool {
        self.spill.is_some()
    }

    /// Size of the in-memory prefix
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// Stop the background copy and release the spill file. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.memory = Vec::new();
        if let Some(spill) = self.spill.take() {
            spill.shared.stop.store(true, Ordering::SeqCst);
            let shared = spill.shared;
            drop(spill.file);
            shared.release_reader();
        }
    }
}

impl Read for SpillStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed || buf.is_empty() {
            return Ok(0);
        }

        if self.mem_pos < self.memory.len() {
            let n = buf.len().min(self.memory.len() - self.mem_pos);
            buf[..n].copy_from_slice(&self.memory[self.mem_pos..self.mem_pos + n]);
            self.mem_pos += n;
            return Ok(n);
        }

        let Some(spill) = self.spill.as_mut() else {
            return Ok(0);
        };

        let available = {
            let mut progress = spill.shared.progress.lock();
            loop {
                if progress.written > spill.pos {
                    break progress.written - spill.pos;
                }
                match &progress.state {
                    CopyState::Writing => {}
                    CopyState::Completed => return Ok(0),
                    CopyState::Failed { kind, message } => {
                        return Err(io::Error::new(*kind, message.clone()))
                    }
                }
                spill.shared.signal.wait(&mut progress);
            }
        };

        let want = (buf.len() as u64).min(available) as usize;
        let n = spill.file.read(&mut buf[..want])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "spill file shorter than bytes reported written",
            ));
        }
        spill.pos += n as u64;
        Ok(n)
    }
}

impl Drop for SpillStream {
    fn drop(&mut self) {
        self.close();
    }
}

/// Background copy: drain `source` into `file`, publishing progress after
/// every chunk.
fn copy_to_file(
    mut source: Box<dyn Read + Send>,
    mut file: File,
    chunk_size: usize,
    shared: Arc<Shared>,
) {
    let mut buf = vec![0u8; chunk_size];
    let mut total: u64 = 0;
    let outcome = loop {
        if shared.stop.load(Ordering::SeqCst) {
            break Err(io::Error::new(io::ErrorKind::Interrupted, "spill copy stopped"));
        }
        match source.read(&mut buf) {
            Ok(0) => break Ok(()),
            Ok(n) => {
                if let Err(e) = file.write_all(&buf[..n]) {
                    break Err(e);
                }
                total += n as u64;
                shared.progress.lock().written = total;
                shared.signal.notify_all();
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => break Err(e),
        }
    };

    match outcome {
        Ok(()) => {
            tracing::debug!(bytes = total, "spill copy completed");
            shared.finish(CopyState::Completed);
        }
        Err(e) => {
            if shared.stop.load(Ordering::SeqCst) {
                tracing::trace!(bytes = total, "spill copy stopped by reader");
            } else {
                tracing::warn!(bytes = total, error = %e, "spill copy failed");
            }
            shared.finish(CopyState::Failed {
                kind: e.kind(),
                message: e.to_string(),
            });
        }
    }

    drop(file);
    drop(source);
    shared.release_writer();
}
