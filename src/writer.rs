//! Output side: streamed JSON-array containers and profile-coverage bookkeeping.

use crate::partition::{Partition, PartitionKind};
use crate::profile::ProfileMap;
use crate::progress::ProgressScope;
use crate::rebuild::build_thread;
use crate::record::user_key;
use crate::tree::TreeNode;
use crate::util::{create_with_backoff, replace_file_atomic};
use ahash::AHashSet;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Coverage below this fraction triggers a warning.
pub const LOW_COVERAGE_FRACTION: f64 = 0.10;

/// Writes a JSON array one element at a time: `[\n`, elements joined by `,\n`, `\n]`.
///
/// Output goes to `<dest>.inprogress` and is promoted to `dest` by [`finish`], so
/// an interrupted run never leaves a half-written container at `dest`.
///
/// [`finish`]: JsonArrayWriter::finish
pub struct JsonArrayWriter {
    tmp: PathBuf,
    dest: PathBuf,
    w: BufWriter<File>,
    written: u64,
}

impl JsonArrayWriter {
    pub fn create(dest: &Path, buf_bytes: usize) -> Result<Self> {
        let name = dest
            .file_name()
            .ok_or_else(|| anyhow!("output path has no file name: {}", dest.display()))?;
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let tmp = dest.with_file_name(format!("{}.inprogress", name.to_string_lossy()));
        let f = create_with_backoff(&tmp, 16, 50).with_context(|| format!("create {}", tmp.display()))?;
        let mut w = BufWriter::with_capacity(buf_bytes.max(8 * 1024), f);
        w.write_all(b"[\n")?;
        Ok(Self { tmp, dest: dest.to_path_buf(), w, written: 0 })
    }

    /// Append one pretty-printed element.
    pub fn write<T: Serialize>(&mut self, item: &T) -> Result<()> {
        if self.written > 0 {
            self.w.write_all(b",\n")?;
        }
        serde_json::to_writer_pretty(&mut self.w, item)?;
        self.written += 1;
        Ok(())
    }

    /// Close the array, flush, and move the file into place. Returns the element count.
    pub fn finish(mut self) -> Result<u64> {
        self.w.write_all(b"\n]")?;
        self.w.flush().with_context(|| format!("flush {}", self.tmp.display()))?;
        let Self { tmp, dest, w, written } = self;
        drop(w);
        replace_file_atomic(&tmp, &dest)?;
        Ok(written)
    }
}

/// Distinct users seen in written trees, and those among them with interests.
#[derive(Clone, Debug, Default)]
pub struct CoverageStats {
    users: AHashSet<String>,
    with_interests: AHashSet<String>,
}

impl CoverageStats {
    /// Record every node of `tree`, root included.
    pub fn observe(&mut self, tree: &TreeNode) {
        tree.walk(&mut |n| {
            let uid = user_key(&n.user_id);
            if uid.is_empty() {
                return;
            }
            if !n.interests.is_empty() {
                self.with_interests.insert(uid.clone());
            }
            self.users.insert(uid);
        });
    }

    pub fn users(&self) -> usize {
        self.users.len()
    }

    pub fn users_with_interests(&self) -> usize {
        self.with_interests.len()
    }

    /// Fraction of users with interests; `None` when no users were seen.
    pub fn ratio(&self) -> Option<f64> {
        let total = self.users();
        (total > 0).then(|| self.users_with_interests() as f64 / total as f64)
    }

    pub fn is_low(&self) -> bool {
        let total = self.users();
        total > 0 && (self.users_with_interests() as f64) < total as f64 * LOW_COVERAGE_FRACTION
    }
}

/// What one partition write produced.
#[derive(Clone, Debug)]
pub struct WriteReport {
    pub kind: PartitionKind,
    pub path: PathBuf,
    pub records: u64,
    pub coverage: CoverageStats,
}

/// Rebuild and stream every sampled record of `part` to `dest`.
///
/// Consumes the partition; its records are dropped once written.
pub fn write_partition(
    mut part: Partition,
    dest: &Path,
    profiles: &ProfileMap,
    write_buf_bytes: usize,
    progress: bool,
) -> Result<WriteReport> {
    let mut writer = JsonArrayWriter::create(dest, write_buf_bytes)?;
    let mut coverage = CoverageStats::default();
    let pb = progress.then(|| ProgressScope::count(format!("Writing {}", part.kind), part.records.len() as u64));

    for record in &part.records {
        let tree = build_thread(record, profiles, &mut part.counts);
        coverage.observe(&tree);
        writer.write(&tree)?;
        if let Some(pb) = &pb {
            pb.inc_items(1);
        }
    }
    let records = writer.finish()?;
    if let Some(pb) = &pb {
        pb.finish(format!("Writing {} done", part.kind));
    }

    tracing::info!(
        "[{}] {} | records: {} | users: {} | with interests: {}",
        part.kind,
        dest.display(),
        records,
        coverage.users(),
        coverage.users_with_interests()
    );
    if coverage.is_low() {
        tracing::warn!(
            "[{}] low profile coverage for {}: {} records, {} of {} users have interests ({:.1}%)",
            part.kind,
            dest.display(),
            records,
            coverage.users_with_interests(),
            coverage.users(),
            coverage.ratio().unwrap_or(0.0) * 100.0
        );
    }

    Ok(WriteReport { kind: part.kind, path: dest.to_path_buf(), records, coverage })
}
