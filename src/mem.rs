//! Memory advisory for the evaluation buffer, the one structure that grows with the corpus.

use sysinfo::{System, SystemExt};

/// Watches the evaluation buffer as it grows and warns once when free memory
/// runs low. The buffer is held in full until the split, so this only reports.
///
/// System memory is sampled every `every` buffered records, not on every push.
pub struct BufferWatch {
    sys: Option<System>,
    every: usize,
    low_frac: f64,
    warned: bool,
}

impl BufferWatch {
    pub fn new(every: usize, low_frac: f64) -> Self {
        Self { sys: None, every: every.max(1), low_frac, warned: false }
    }

    /// Available / total system memory right now, in `0.0..=1.0`. Reads 1.0 when
    /// the platform reports no total.
    pub fn available_fraction(&mut self) -> f64 {
        let sys = self.sys.get_or_insert_with(System::new);
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return 1.0;
        }
        (sys.available_memory() as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Call after each push with the new buffer length.
    pub fn observe(&mut self, buffered: usize) {
        if self.warned || buffered % self.every != 0 {
            return;
        }
        let frac = self.available_fraction();
        if frac < self.low_frac {
            self.warned = true;
            tracing::warn!(
                buffered,
                "available memory at {:.1}% while buffering evaluation records; \
                 consider narrowing the evaluation window",
                frac * 100.0
            );
        }
    }

    pub fn warned(&self) -> bool {
        self.warned
    }
}

impl Default for BufferWatch {
    fn default() -> Self {
        Self::new(10_000, 0.10)
    }
}
