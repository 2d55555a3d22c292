use crate::bucketing::DayWindow;
use std::path::{Path, PathBuf};

/// Run options: defaults plus `with_*` chaining.
#[derive(Clone, Debug)]
pub struct SplitOptions {
    pub inputs: Vec<PathBuf>,         // files or directories, processed in order
    pub profile: Option<PathBuf>,     // None => no interests anywhere
    pub mapping: Option<PathBuf>,     // real id -> anonymized id
    pub train_out: PathBuf,
    pub val_out: PathBuf,
    pub test_out: PathBuf,
    pub seed: u64,

    // windows are ages in days relative to the newest timestamp, [start, end)
    pub eval_days: DayWindow,
    pub train_days: DayWindow,

    // per-partition Bernoulli sampling rates, 0.0..=1.0
    pub train_rate: f64,
    pub val_rate: f64,
    pub test_rate: f64,

    pub progress: bool,

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            profile: None,
            mapping: None,
            train_out: PathBuf::from("train.json"),
            val_out: PathBuf::from("val.json"),
            test_out: PathBuf::from("test.json"),
            seed: 42,
            eval_days: DayWindow::new(0.0, 7.0),
            train_days: DayWindow::new(7.0, 30.0),
            train_rate: 1.0,
            val_rate: 0.05,
            test_rate: 0.05,
            progress: true,
            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl SplitOptions {
    pub fn with_inputs<I, P>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.inputs = inputs.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
        self
    }
    pub fn with_profile(mut self, path: impl AsRef<Path>) -> Self {
        self.profile = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_mapping(mut self, path: impl AsRef<Path>) -> Self {
        self.mapping = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_outputs(mut self, train: impl AsRef<Path>, val: impl AsRef<Path>, test: impl AsRef<Path>) -> Self {
        self.train_out = train.as_ref().to_path_buf();
        self.val_out = val.as_ref().to_path_buf();
        self.test_out = test.as_ref().to_path_buf();
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
    pub fn with_eval_days(mut self, start: f64, end: f64) -> Self {
        self.eval_days = DayWindow::new(start, end);
        self
    }
    pub fn with_train_days(mut self, start: f64, end: f64) -> Self {
        self.train_days = DayWindow::new(start, end);
        self
    }
    pub fn with_rates(mut self, train: f64, val: f64, test: f64) -> Self {
        self.train_rate = train;
        self.val_rate = val;
        self.test_rate = test;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}
