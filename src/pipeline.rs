//! End-to-end run: profiles, timestamp scan, routing pass, evaluation split, writes.

use crate::bucketing::{RecordPartitioner, RoutingStats};
use crate::config::SplitOptions;
use crate::error::SplitError;
use crate::ndjson::{expand_inputs, for_each_line, total_size};
use crate::partition::{fill_partition, split_eval_buffer, PartitionKind};
use crate::profile::ProfileMap;
use crate::progress::ProgressScope;
use crate::scan::scan_latest_timestamp;
use crate::util::init_tracing_once;
use crate::writer::{write_partition, WriteReport};
use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use time::OffsetDateTime;

/// Builder-style entry point.
///
/// ```no_run
/// use threadsplit::DatasetSplitter;
/// let summary = DatasetSplitter::new()
///     .inputs(["posts.jsonl"])
///     .profile("profiles.json")
///     .outputs("train.json", "val.json", "test.json")
///     .seed(7)
///     .run()?;
/// println!("{} validation records", summary.val.records);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct DatasetSplitter {
    pub(crate) opts: SplitOptions,
}

/// What a run did.
#[derive(Clone, Debug)]
pub struct SplitSummary {
    pub latest: OffsetDateTime,
    pub profiles: usize,
    pub scanned_lines: u64,
    pub routing: RoutingStats,
    pub eval_buffered: usize,
    pub val_candidates: usize,
    pub test_candidates: usize,
    pub train_candidates: usize,
    pub val: WriteReport,
    pub test: WriteReport,
    pub train: WriteReport,
}

impl DatasetSplitter {
    pub fn new() -> Self {
        Self { opts: SplitOptions::default() }
    }

    pub fn from_options(opts: SplitOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn inputs<I, P>(mut self, inputs: I) -> Self where I: IntoIterator<Item = P>, P: AsRef<Path> { self.opts = self.opts.with_inputs(inputs); self }
    pub fn profile(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_profile(path); self }
    pub fn mapping(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_mapping(path); self }
    pub fn outputs(mut self, train: impl AsRef<Path>, val: impl AsRef<Path>, test: impl AsRef<Path>) -> Self { self.opts = self.opts.with_outputs(train, val, test); self }
    pub fn seed(mut self, seed: u64) -> Self { self.opts = self.opts.with_seed(seed); self }
    pub fn eval_days(mut self, start: f64, end: f64) -> Self { self.opts = self.opts.with_eval_days(start, end); self }
    pub fn train_days(mut self, start: f64, end: f64) -> Self { self.opts = self.opts.with_train_days(start, end); self }
    pub fn rates(mut self, train: f64, val: f64, test: f64) -> Self { self.opts = self.opts.with_rates(train, val, test); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    pub fn options(&self) -> &SplitOptions {
        &self.opts
    }

    fn validate(&self) -> Result<(), SplitError> {
        if self.opts.inputs.is_empty() {
            return Err(SplitError::NoInputs);
        }
        let rates = [
            ("train", self.opts.train_rate),
            ("validation", self.opts.val_rate),
            ("test", self.opts.test_rate),
        ];
        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(SplitError::InvalidRate { name, value });
            }
        }
        Ok(())
    }

    /// Run all passes and write the three containers.
    ///
    /// Nothing is written when the corpus has no parseable timestamp; the error
    /// is [`SplitError::NoTemporalAnchor`].
    pub fn run(self) -> Result<SplitSummary> {
        init_tracing_once();
        self.validate()?;
        let opts = &self.opts;

        tracing::info!("[1/5] loading user profiles");
        let profiles = match &opts.profile {
            Some(p) => ProfileMap::load(p, opts.mapping.as_deref()),
            None => ProfileMap::empty(),
        };
        tracing::info!("      loaded {} user profiles", profiles.len());

        let inputs = expand_inputs(&opts.inputs);
        if inputs.is_empty() {
            return Err(SplitError::NoInputs.into());
        }

        tracing::info!("[2/5] scanning {} input(s) for the newest timestamp", inputs.len());
        let scan = scan_latest_timestamp(&inputs, opts.read_buffer_bytes, opts.progress)?;
        tracing::info!(
            "      newest timestamp: {} ({} of {} lines dated)",
            scan.latest,
            scan.dated,
            scan.lines
        );

        tracing::info!("[3/5] routing records: eval window {:?} days, train window {:?} days", opts.eval_days, opts.train_days);
        let mut rng = ChaCha8Rng::seed_from_u64(opts.seed);
        let mut router = RecordPartitioner::new(scan.latest, opts.eval_days, opts.train_days, opts.train_rate, &mut rng);
        let pb = opts.progress.then(|| ProgressScope::bytes("Routing records", total_size(&inputs)));
        for path in &inputs {
            for_each_line(
                path,
                opts.read_buffer_bytes,
                |delta| {
                    if let Some(pb) = &pb {
                        pb.inc_bytes(delta);
                    }
                },
                |line| router.offer_line(line),
            )?;
        }
        if let Some(pb) = &pb {
            pb.finish("Routing records done");
        }
        let (train, eval_buffer, routing) = router.finish();
        if routing.undated + routing.malformed > 0 {
            tracing::info!(
                "      skipped {} undated and {} malformed record(s)",
                routing.undated,
                routing.malformed
            );
        }

        let eval_buffered = eval_buffer.len();
        tracing::info!("      splitting evaluation buffer ({} records)", eval_buffered);
        let (val_candidates, test_candidates) = split_eval_buffer(eval_buffer, &mut rng);
        let (n_val, n_test) = (val_candidates.len(), test_candidates.len());
        tracing::info!("      validation candidates: {} | test candidates: {}", n_val, n_test);

        let val = fill_partition(PartitionKind::Validation, val_candidates, opts.val_rate, &mut rng);
        let test = fill_partition(PartitionKind::Test, test_candidates, opts.test_rate, &mut rng);
        let train_candidates = train.candidates;

        for (part, window, rate) in [
            (&val, opts.eval_days, opts.val_rate),
            (&test, opts.eval_days, opts.test_rate),
            (&train, opts.train_days, opts.train_rate),
        ] {
            tracing::info!(
                "      [{}] window: [{}, {}) days | rate: {} | sampled: {}",
                part.kind,
                window.start,
                window.end,
                rate,
                part.records.len()
            );
        }

        tracing::info!("[4/5] writing outputs");
        let val = write_partition(val, &opts.val_out, &profiles, opts.write_buffer_bytes, opts.progress)?;
        let test = write_partition(test, &opts.test_out, &profiles, opts.write_buffer_bytes, opts.progress)?;
        let train = write_partition(train, &opts.train_out, &profiles, opts.write_buffer_bytes, opts.progress)?;

        tracing::info!("[5/5] done");
        Ok(SplitSummary {
            latest: scan.latest,
            profiles: profiles.len(),
            scanned_lines: scan.lines,
            routing,
            eval_buffered,
            val_candidates: n_val,
            test_candidates: n_test,
            train_candidates,
            val,
            test,
            train,
        })
    }
}
