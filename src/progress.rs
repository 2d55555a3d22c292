//! Progress bars for the input passes (bytes) and the partition writes (records).

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BYTES_TEMPLATE: &str = "{spinner:.green} {msg} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
     {bytes_per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}";

const COUNT_TEMPLATE: &str = "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
     it/s: {per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}";

fn styled(total: u64, template: &str, label: String) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    if !label.is_empty() {
        pb.set_message(label);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Thin wrapper over an `indicatif` bar, either byte- or item-counted.
pub struct ProgressScope {
    pb: ProgressBar,
}

impl ProgressScope {
    pub fn bytes<T: Into<String>>(label: T, total_bytes: u64) -> Self {
        Self { pb: styled(total_bytes, BYTES_TEMPLATE, label.into()) }
    }

    pub fn count<T: Into<String>>(label: T, total: u64) -> Self {
        Self { pb: styled(total, COUNT_TEMPLATE, label.into()) }
    }

    #[inline]
    pub fn inc_bytes(&self, delta: u64) {
        self.pb.inc(delta);
    }

    #[inline]
    pub fn inc_items(&self, delta: u64) {
        self.pb.inc(delta);
    }

    pub fn finish<T: Into<String>>(&self, msg: T) {
        self.pb.finish_with_message(msg.into());
    }
}
