use thiserror::Error;

/// Run-level failures the binary distinguishes by exit status.
/// Per-record problems never show up here; those records are skipped.
#[derive(Debug, Error)]
pub enum SplitError {
    /// No record in any input had a parseable `created_at`.
    #[error("no parseable timestamp in any of {sources} input(s); cannot anchor time windows")]
    NoTemporalAnchor { sources: usize },

    #[error("{name} sampling rate must be within [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("no input files given")]
    NoInputs,
}

impl SplitError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            SplitError::NoTemporalAnchor { .. } => 2,
            _ => 1,
        }
    }
}
