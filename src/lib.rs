// src/lib.rs
// Public library surface for integration tests (and the binary).

pub mod api;
pub mod config;
pub mod metrics;
pub mod present;
pub mod service;

// Normalization pipeline, leaves first
pub mod normalize;
pub mod dates;
pub mod taxonomy;
pub mod classify;
pub mod dedup;
pub mod sequence;
pub mod payload;
pub mod pipeline;

// Payload sources + ingest glue
pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::ingest::types::{Feed, NormalizedItem, PayloadSource, RawRecord};
pub use crate::pipeline::Pipeline;
pub use crate::taxonomy::SourceTaxonomy;
