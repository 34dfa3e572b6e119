//! analysis
//!
//! The map-reduce analysis pipeline.
//!
//! # Architecture
//!
//! - [`document`]: Issue → Document projection with body preview capping
//! - [`chunk`]: Pure order-preserving partitioning
//! - [`engine`]: Path selection, map stage, iterative reduction, synthesis
//!
//! Documents, chunks, and intermediate summaries are created and discarded
//! within a single analysis call; nothing here is persisted.

pub mod chunk;
pub mod document;
pub mod engine;

pub use document::{format_documents, Document};
pub use engine::{AnalysisError, Analyzer, Tuning};
