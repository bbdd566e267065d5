//! Enrichment pipeline and domain logic for MacroFind.
//!
//! This crate derives search queries from a findings document's month,
//! turns search hits into findings, deduplicates them against everything the
//! document already holds, and appends the survivors as new result groups
//! (e.g., `enrich_file`).

pub mod dedup;
pub mod document;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod queries;
pub mod summary;
