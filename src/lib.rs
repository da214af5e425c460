pub mod concurrent;
pub mod config;
pub mod enrich;
pub mod filter;
pub mod gather;
pub mod http_client;
pub mod output;
pub mod pipeline;
pub mod utils;

// re-export modules used in tests
pub use crate::concurrent::{AggregationState, DedupMode, DedupSet};
pub use crate::filter::is_valid;
pub use crate::gather::{extract_all_urls, extract_parameters};
pub use crate::pipeline::{Pipeline, RunSummary, UrlOutcome};
