//! Second pass: route each record by age into the training stream or the
//! evaluation buffer.
//!
//! Training records are counted and sampled as they stream past. Evaluation
//! records are only buffered; they are split and counted once the pass is over.

use crate::date::{age_in_days, parse_created_at};
use crate::mem::BufferWatch;
use crate::partition::{Partition, PartitionKind};
use crate::record::{Record, TimestampProbe};
use rand::Rng;
use time::OffsetDateTime;

/// Half-open `[start, end)` window over record age in days.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayWindow {
    pub start: f64,
    pub end: f64,
}

impl DayWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, age_days: f64) -> bool {
        self.start <= age_days && age_days < self.end
    }
}

/// Where a record goes after its age is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    Eval,
    Train,
    Discard,
}

/// The evaluation window is checked first and wins when both windows match.
pub fn classify_age(age_days: f64, eval: &DayWindow, train: &DayWindow) -> Bucket {
    if eval.contains(age_days) {
        Bucket::Eval
    } else if train.contains(age_days) {
        Bucket::Train
    } else {
        Bucket::Discard
    }
}

/// Line accounting for the routing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoutingStats {
    pub lines: u64,
    pub undated: u64,
    pub malformed: u64,
    pub discarded: u64,
    pub buffered: u64,
    pub streamed: u64,
}

/// Streaming router for the second pass. Feed it lines with [`offer_line`],
/// then take the train partition and the evaluation buffer with [`finish`].
///
/// [`offer_line`]: RecordPartitioner::offer_line
/// [`finish`]: RecordPartitioner::finish
pub struct RecordPartitioner<'r, R: Rng> {
    latest: OffsetDateTime,
    eval_days: DayWindow,
    train_days: DayWindow,
    train_rate: f64,
    rng: &'r mut R,
    train: Partition,
    eval_buffer: Vec<Record>,
    watch: BufferWatch,
    stats: RoutingStats,
}

impl<'r, R: Rng> RecordPartitioner<'r, R> {
    pub fn new(
        latest: OffsetDateTime,
        eval_days: DayWindow,
        train_days: DayWindow,
        train_rate: f64,
        rng: &'r mut R,
    ) -> Self {
        Self {
            latest,
            eval_days,
            train_days,
            train_rate,
            rng,
            train: Partition::new(PartitionKind::Train),
            eval_buffer: Vec::new(),
            watch: BufferWatch::default(),
            stats: RoutingStats::default(),
        }
    }

    /// Route one raw input line. Never fails; bad lines are counted and dropped.
    pub fn offer_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.stats.lines += 1;

        let ts = serde_json::from_str::<TimestampProbe>(line)
            .ok()
            .and_then(|p| p.created_at_str().and_then(parse_created_at));
        let Some(ts) = ts else {
            tracing::debug!("skipping line without a parseable created_at");
            self.stats.undated += 1;
            return;
        };

        let bucket = classify_age(age_in_days(self.latest, ts), &self.eval_days, &self.train_days);
        if bucket == Bucket::Discard {
            self.stats.discarded += 1;
            return;
        }

        let record = match Record::parse(line) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("skipping malformed record: {}", e);
                self.stats.malformed += 1;
                return;
            }
        };
        if bucket == Bucket::Eval {
            self.eval_buffer.push(record);
            self.stats.buffered += 1;
            self.watch.observe(self.eval_buffer.len());
        } else {
            self.train.admit(record, self.train_rate, &mut *self.rng);
            self.stats.streamed += 1;
        }
    }

    pub fn stats(&self) -> RoutingStats {
        self.stats
    }

    /// The finished train partition, the evaluation buffer, and the pass stats.
    pub fn finish(self) -> (Partition, Vec<Record>, RoutingStats) {
        (self.train, self.eval_buffer, self.stats)
    }
}
