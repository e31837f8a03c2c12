//! Synthetic producer/consumer pairs running at different speeds

use fluree_spill::{spill_pool, SpillConfig, SpillStream};
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 256) as u8).collect()
}

/// Hands out `chunk` bytes per read, sleeping before each one
struct SlowSource {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    delay: Duration,
}

impl Read for SlowSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Ok(0);
        }
        thread::sleep(self.delay);
        let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Never ends; counts how many reads it served
struct EndlessSource {
    reads: Arc<AtomicUsize>,
}

impl Read for EndlessSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(1));
        buf.fill(b'x');
        Ok(buf.len())
    }
}

/// Fails the test instead of hanging forever
fn with_deadline<T: Send + 'static>(limit: Duration, f: impl FnOnce() -> T + Send + 'static) -> T {
    let done = Arc::new(AtomicBool::new(false));
    let flag = done.clone();
    let handle = thread::spawn(move || {
        let out = f();
        flag.store(true, Ordering::SeqCst);
        out
    });
    let start = Instant::now();
    while !done.load(Ordering::SeqCst) {
        assert!(start.elapsed() < limit, "reader did not finish within {:?}", limit);
        thread::sleep(Duration::from_millis(5));
    }
    handle.join().unwrap()
}

fn wait_until_empty(dir: &std::path::Path) {
    let start = Instant::now();
    while std::fs::read_dir(dir).unwrap().count() > 0 {
        assert!(start.elapsed() < Duration::from_secs(5), "spill file was not removed");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn slow_consumer_fast_producer() {
    let dir = tempfile::tempdir().unwrap();
    let data = payload(256 * 1024);
    let cfg = SpillConfig::default()
        .with_memory_limit(16 * 1024)
        .with_chunk_size(4096)
        .with_temp_dir(dir.path());
    let pool = spill_pool(2).unwrap();
    let mut stream =
        SpillStream::new(Box::new(io::Cursor::new(data.clone())), &cfg, &pool).unwrap();
    assert!(stream.is_spilled());

    let mut out = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
        thread::sleep(Duration::from_micros(200));
    }
    assert_eq!(out, data);

    drop(stream);
    wait_until_empty(dir.path());
}

#[test]
fn fast_consumer_slow_producer_blocks_then_sees_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_path_buf();
    let data = payload(20_000);
    let expected = data.clone();

    let out = with_deadline(Duration::from_secs(30), move || {
        let cfg = SpillConfig::default()
            .with_memory_limit(1000)
            .with_chunk_size(512)
            .with_temp_dir(path);
        let pool = spill_pool(1).unwrap();
        let source = SlowSource {
            data,
            pos: 0,
            chunk: 700,
            delay: Duration::from_millis(2),
        };
        let mut stream = SpillStream::new(Box::new(source), &cfg, &pool).unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        // Blocking again after the producer finished must not hang
        assert_eq!(stream.read(&mut [0u8; 16]).unwrap(), 0);
        out
    });
    assert_eq!(out, expected);
    wait_until_empty(dir.path());
}

#[test]
fn many_concurrent_streams_share_one_pool() {
    let pool = Arc::new(spill_pool(2).unwrap());
    let cfg = SpillConfig::default().with_memory_limit(512).with_chunk_size(1024);

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let pool = pool.clone();
            let cfg = cfg.clone();
            thread::spawn(move || {
                let data = payload(10_000 + i * 1_000);
                let mut stream =
                    SpillStream::new(Box::new(io::Cursor::new(data.clone())), &cfg, &pool).unwrap();
                let mut out = Vec::new();
                stream.read_to_end(&mut out).unwrap();
                assert_eq!(out, data);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn close_stops_the_copy_and_removes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let reads = Arc::new(AtomicUsize::new(0));
    let cfg = SpillConfig::default()
        .with_memory_limit(64)
        .with_chunk_size(64)
        .with_temp_dir(dir.path());
    let pool = spill_pool(1).unwrap();
    let mut stream = SpillStream::new(
        Box::new(EndlessSource {
            reads: reads.clone(),
        }),
        &cfg,
        &pool,
    )
    .unwrap();

    let mut buf = [0u8; 32];
    assert_eq!(stream.read(&mut buf).unwrap(), 32);
    stream.close();

    wait_until_empty(dir.path());
    let after_close = reads.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(reads.load(Ordering::SeqCst), after_close);
}
