//! issuelens - scan and analyze GitHub issues with an LLM
//!
//! issuelens is a single-binary tool that fetches a repository's open issues
//! into a local cache, then answers questions about them using a map-reduce
//! pipeline over an LLM: small issue sets are analyzed in one call, larger
//! sets are summarized in batches whose summaries are folded together before
//! a final synthesis.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to services)
//! - [`service`] - Scan and analyze orchestration
//! - [`source`] - Issue tracker abstraction (GitHub v1)
//! - [`llm`] - Completion model abstraction (OpenAI v1)
//! - [`analysis`] - Document formatting and the map-reduce engine
//! - [`store`] - Local issue cache (SQLite)
//! - [`config`] - Configuration schema and loading
//!
//! # Correctness Invariants
//!
//! 1. Pull requests never enter the issue cache
//! 2. A failed scan never clobbers a previously cached scan
//! 3. Analysis reads only the cache; it never contacts the issue tracker
//! 4. A failed analysis returns an error, never a partial result

pub mod analysis;
pub mod cli;
pub mod config;
pub mod llm;
pub mod service;
pub mod source;
pub mod store;
