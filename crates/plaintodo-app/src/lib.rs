//! Application layer logic for plaintodo.
//!
//! This crate provides the storage abstraction, the backup and mutation
//! services, read-only reports and project configuration used by the CLI.

pub mod backup;
pub mod config;
pub mod engine;
pub mod memory_store;
pub mod report_service;
pub mod store;

// Re-exports for convenience
pub use backup::{BackupManager, labelled_diff};
pub use config::{CONFIG_FILE, ListsConfig, ProjectConfig};
pub use engine::{MutationEngine, MutationError};
pub use memory_store::MemoryStore;
pub use report_service::{Listing, ReportService};
pub use store::LineStore;
