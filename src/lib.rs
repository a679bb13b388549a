//! Batch pipeline for classifying archived pull request events.
//!
//! Ingests CSV rows whose `payload` column holds a JSON-encoded pull request
//! event, normalizes the free text, assigns change-category labels from a
//! fixed keyword taxonomy, and tallies acceptance outcomes per label.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod normalize;
pub mod processor;
pub mod taxonomy;
pub mod types;

pub use aggregate::{rescale, AggregateCounts, LabelTally, OutcomeShares};
pub use classify::LabelClassifier;
pub use config::{Config, ConfigBuilder, LabelPolicy, RelevanceScope};
pub use error::{Error, Result};
pub use extract::RecordExtractor;
pub use normalize::TextNormalizer;
pub use processor::BatchProcessor;
pub use taxonomy::{LabelRule, PriorityTier, Taxonomy};
pub use types::{AssignedLabels, Links, PullRequestRecord};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::aggregate::{rescale, AggregateCounts};
    pub use crate::config::{Config, ConfigBuilder, LabelPolicy, RelevanceScope};
    pub use crate::error::{Error, Result};
    pub use crate::processor::BatchProcessor;
    pub use crate::taxonomy::Taxonomy;
    pub use crate::types::{AssignedLabels, PullRequestRecord};
    pub use futures::StreamExt;
}
