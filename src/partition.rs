//! Partitions (train / validation / test) and the evaluation-buffer split.
//!
//! Every partition owns its own `InteractionCounter`. Records are counted when
//! they are admitted as candidates and only then sampled, so the counts describe
//! the whole candidate population rather than the written subset.

use crate::counting::{count_interactions, InteractionCounter};
use crate::record::Record;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartitionKind {
    Train,
    Validation,
    Test,
}

impl PartitionKind {
    pub fn label(self) -> &'static str {
        match self {
            PartitionKind::Train => "Train",
            PartitionKind::Validation => "Val",
            PartitionKind::Test => "Test",
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug)]
pub struct Partition {
    pub kind: PartitionKind,
    /// Sampled records, in admission order. These are the ones written out.
    pub records: Vec<Record>,
    pub counts: InteractionCounter,
    /// Records counted into this partition before sampling.
    pub candidates: usize,
}

impl Partition {
    pub fn new(kind: PartitionKind) -> Self {
        Self { kind, records: Vec::new(), counts: InteractionCounter::new(), candidates: 0 }
    }

    /// Count `record` into this partition, then keep it with probability `rate`.
    pub fn admit<R: Rng>(&mut self, record: Record, rate: f64, rng: &mut R) {
        count_interactions(&record, &mut self.counts);
        self.candidates += 1;
        if rng.gen::<f64>() < rate {
            self.records.push(record);
        }
    }
}

/// Shuffle the evaluation buffer and cut it at `len / 2`.
/// The first half becomes validation candidates, the rest test candidates.
pub fn split_eval_buffer<R: Rng>(mut buffer: Vec<Record>, rng: &mut R) -> (Vec<Record>, Vec<Record>) {
    buffer.shuffle(rng);
    let mid = buffer.len() / 2;
    let test = buffer.split_off(mid);
    (buffer, test)
}

/// Build a partition from `candidates`: count every one, sample at `rate`.
pub fn fill_partition<R: Rng>(
    kind: PartitionKind,
    candidates: Vec<Record>,
    rate: f64,
    rng: &mut R,
) -> Partition {
    let mut part = Partition::new(kind);
    for record in candidates {
        part.admit(record, rate, rng);
    }
    part
}
