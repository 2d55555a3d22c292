//! NDJSON input streaming: plain or zstd-compressed files, with byte-level progress,
//! plus expansion of directory arguments into their input files.

use crate::util::open_with_backoff;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;
use zstd::stream::read::Decoder;

const INPUT_EXTENSIONS: &[&str] = &["jsonl", "ndjson", "json", "zst"];

fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| INPUT_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

fn is_zst(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("zst")).unwrap_or(false)
}

/// Replace each directory in `paths` with the input files below it, in file-name order.
/// Plain file arguments pass through untouched and keep their position.
pub fn expand_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(paths.len());
    for p in paths {
        if !p.is_dir() {
            out.push(p.clone());
            continue;
        }
        let before = out.len();
        for entry in WalkDir::new(p).min_depth(1).sort_by_file_name() {
            match entry {
                Ok(ent) if ent.file_type().is_file() && has_input_extension(ent.path()) => {
                    out.push(ent.into_path());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("skipping unreadable entry under {}: {}", p.display(), e),
            }
        }
        if out.len() == before {
            tracing::warn!("input directory {} contains no .jsonl/.ndjson/.json/.zst files", p.display());
        }
    }
    out
}

/// Total on-disk size of `paths`, for byte progress bars.
pub fn total_size(paths: &[PathBuf]) -> u64 {
    paths.iter().map(|p| fs::metadata(p).map(|m| m.len()).unwrap_or(0)).sum()
}

/// A `Read` wrapper that counts on-disk bytes read.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// Stream `path` line by line, calling `on_line` with each line minus its `\r?\n`.
///
/// `.zst` files are decoded on the fly. `on_progress` receives deltas of on-disk bytes.
/// Lines that are not valid UTF-8 are skipped. Failing to open the file is an error;
/// a read or decode failure part-way through logs a warning and ends this file only.
pub fn for_each_line(
    path: &Path,
    read_buf_bytes: usize,
    mut on_progress: impl FnMut(u64),
    mut on_line: impl FnMut(&str),
) -> Result<()> {
    let file = open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
    let counter = Arc::new(AtomicU64::new(0));
    let counted = CountingReader { inner: file, counter: counter.clone() };

    let source: Box<dyn Read> = if is_zst(path) {
        let mut decoder = Decoder::new(counted).with_context(|| format!("zstd decoder for {}", path.display()))?;
        decoder.window_log_max(31)?;
        Box::new(decoder)
    } else {
        Box::new(counted)
    };
    let mut reader = BufReader::with_capacity(read_buf_bytes.max(8 * 1024), source);

    let mut buf: Vec<u8> = Vec::with_capacity(64 * 1024);
    let mut last = 0u64;
    loop {
        buf.clear();
        let n = match reader.read_until(b'\n', &mut buf) {
            Ok(n) => n,
            Err(e) => {
                warn_read_skip(path, &e);
                break;
            }
        };
        let cur = counter.load(Ordering::Relaxed);
        if cur > last {
            on_progress(cur - last);
            last = cur;
        }
        if n == 0 {
            break;
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        match std::str::from_utf8(&buf) {
            Ok(line) => on_line(line),
            Err(_) => tracing::debug!("skipping non-UTF-8 line in {}", path.display()),
        }
    }
    Ok(())
}

fn warn_read_skip(path: &Path, e: &io::Error) {
    let abs = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    tracing::warn!(
        "stopped reading {} after an I/O or decode error: {}. Records after this point are skipped; \
         the run continues with the next input.",
        abs.display(),
        e
    );
}
