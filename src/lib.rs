mod config;
mod date;
mod error;
mod util;
mod mem;
mod progress;
mod ndjson;

mod record;
mod profile;
mod counting;
mod scan;
mod bucketing;
mod partition;

mod tree;
mod rebuild;
mod writer;
mod pipeline;

pub use crate::config::SplitOptions;
pub use crate::error::SplitError;
pub use crate::pipeline::{DatasetSplitter, SplitSummary};

// Timestamp parsing and age arithmetic.
pub use crate::date::{age_in_days, parse_created_at, SECONDS_PER_DAY};

// Input schema.
pub use crate::record::{
    id_key, is_image_comment, user_key, Comment, InteractorRef, NestedComment, Record, ReplyRef, Repost,
    SubComment, TimestampProbe, UserRef, IMAGE_COMMENT_MARKER,
};

// Profiles and interaction counts.
pub use crate::profile::ProfileMap;
pub use crate::counting::{count_interactions, InteractionCounter, InteractionKey};

// Passes: scan, routing, evaluation split.
pub use crate::scan::{scan_latest_timestamp, ScanOutcome};
pub use crate::bucketing::{classify_age, Bucket, DayWindow, RecordPartitioner, RoutingStats};
pub use crate::partition::{fill_partition, split_eval_buffer, Partition, PartitionKind};

// Reconstruction and output.
pub use crate::tree::{NodeKind, TreeNode};
pub use crate::rebuild::build_thread;
pub use crate::writer::{write_partition, CoverageStats, JsonArrayWriter, WriteReport, LOW_COVERAGE_FRACTION};

// Input discovery and streaming, for callers that drive passes themselves.
pub use crate::ndjson::{expand_inputs, for_each_line};

pub use crate::util::init_tracing_once;
pub use crate::mem::BufferWatch;
