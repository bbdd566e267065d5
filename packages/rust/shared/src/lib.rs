//! Shared types, error model, and configuration for MacroFind.
//!
//! This crate is the foundation depended on by all other MacroFind crates.
//! It provides:
//! - [`MacroFindError`] — the unified error type
//! - Domain types ([`FindingsDocument`], [`AgentResult`], [`Finding`], [`Category`])
//! - Configuration ([`AppConfig`], [`SearchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, SearchConfig, SearchProvider, config_dir, config_file_path, init_config,
    load_config, load_config_from, resolve_api_key,
};
pub use error::{MacroFindError, Result};
pub use types::{
    AgentResult, Category, CategoryMap, Finding, FindingsDocument, FindingsMeta, ResultGroup,
};
