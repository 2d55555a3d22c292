//! Per-partition interaction counts keyed by (root author, interactor).

use crate::record::{NestedComment, Record};
use ahash::AHashMap;

/// Directed (root_author_id, interactor_id) pair.
pub type InteractionKey = (String, String);

/// Interaction counts for exactly one partition. Never shared across partitions.
#[derive(Clone, Debug, Default)]
pub struct InteractionCounter {
    counts: AHashMap<InteractionKey, u64>,
}

impl InteractionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one interaction. Not idempotent.
    pub fn increment(&mut self, root_author: &str, interactor: &str) {
        *self
            .counts
            .entry((root_author.to_string(), interactor.to_string()))
            .or_insert(0) += 1;
    }

    /// Current count without touching the map; absent keys read as 0.
    pub fn count_of(&self, root_author: &str, interactor: &str) -> u64 {
        self.counts
            .get(&(root_author.to_string(), interactor.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Current count, registering the key with 0 if it was absent. Never increments.
    pub fn read_or_init(&mut self, root_author: &str, interactor: &str) -> u64 {
        *self
            .counts
            .entry((root_author.to_string(), interactor.to_string()))
            .or_insert(0)
    }

    /// Number of distinct keys (including ones only registered by `read_or_init`).
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Count every interaction implied by `record` into `counter`.
///
/// Walks nested comments to any depth. Image-marked comments are skipped together
/// with everything nested under them; image-marked reposts are skipped.
pub fn count_interactions(record: &Record, counter: &mut InteractionCounter) {
    let root = record.author_key();

    for top in record.comments.iter().filter(|c| !c.is_image()) {
        counter.increment(&root, &top.user.key());
        for sub in top.comments.iter().filter(|s| !s.is_image()) {
            counter.increment(&root, &sub.user.key());

            // Explicit stack below the sub-comment level; pushing in reverse keeps input order.
            let mut stack: Vec<&NestedComment> = sub.comments.iter().rev().collect();
            while let Some(c) = stack.pop() {
                if c.is_image() {
                    continue;
                }
                counter.increment(&root, &c.interactor_key());
                stack.extend(c.comments.iter().rev());
            }
        }
    }

    for r in record.reposts.iter().filter(|r| !r.is_image()) {
        counter.increment(&root, &r.user.key());
    }
}
