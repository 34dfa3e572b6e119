//! service
//!
//! Business logic orchestrating the source, engine, and store.
//!
//! # Architecture
//!
//! - [`scan`]: Fetch all open issues and replace the cache
//! - [`analyze`]: Read the cache and run the analysis pipeline
//!
//! The two pipelines share no state and compose only through the store: a
//! scan writes, an analysis reads, and neither knows the other's internals.
//! Services receive their collaborators explicitly; no globals.

pub mod analyze;
pub mod scan;

pub use analyze::{AnalysisMode, AnalyzeError, AnalyzeService};
pub use scan::{ScanError, ScanOutcome, ScanService};
