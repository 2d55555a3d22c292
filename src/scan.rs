//! First pass: the latest parseable timestamp across every input anchors all windows.

use crate::date::parse_created_at;
use crate::error::SplitError;
use crate::ndjson::{for_each_line, total_size};
use crate::progress::ProgressScope;
use crate::record::TimestampProbe;
use anyhow::Result;
use std::path::PathBuf;
use time::OffsetDateTime;

/// Latest timestamp over all inputs plus line accounting for the pass.
#[derive(Clone, Copy, Debug)]
pub struct ScanOutcome {
    pub latest: OffsetDateTime,
    pub lines: u64,
    pub dated: u64,
}

/// Scan `inputs` in order and return the maximum parseable `created_at`.
///
/// Fails with [`SplitError::NoTemporalAnchor`] when not a single line carries a
/// parseable timestamp.
pub fn scan_latest_timestamp(inputs: &[PathBuf], read_buf_bytes: usize, progress: bool) -> Result<ScanOutcome> {
    let pb = progress.then(|| ProgressScope::bytes("Scanning timestamps", total_size(inputs)));

    let mut latest: Option<OffsetDateTime> = None;
    let mut lines = 0u64;
    let mut dated = 0u64;

    for path in inputs {
        for_each_line(
            path,
            read_buf_bytes,
            |delta| {
                if let Some(pb) = &pb {
                    pb.inc_bytes(delta);
                }
            },
            |line| {
                if line.trim().is_empty() {
                    return;
                }
                lines += 1;
                let Ok(probe) = serde_json::from_str::<TimestampProbe>(line) else { return };
                let Some(ts) = probe.created_at_str().and_then(parse_created_at) else { return };
                dated += 1;
                if latest.map_or(true, |cur| ts > cur) {
                    latest = Some(ts);
                }
            },
        )?;
    }

    if let Some(pb) = &pb {
        pb.finish("Scanning timestamps done");
    }

    match latest {
        Some(latest) => Ok(ScanOutcome { latest, lines, dated }),
        None => Err(SplitError::NoTemporalAnchor { sources: inputs.len() }.into()),
    }
}
