// Course Catalog - Core Library
// In-process data tier: identity-keyed stores, parallel bootstrap from CSV
// sources, and synchronous snapshot persistence after every mutation.

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod entities;
pub mod parser;
pub mod persistence;
pub mod store;

// Re-export commonly used types
pub use bootstrap::{LoadReport, LoadTask, SourceReport};
pub use catalog::Catalog;
pub use config::{Config, EntityKind};
pub use entities::{Course, Instructor, Module, Student};
pub use persistence::SnapshotFormat;
pub use store::{Identified, ReplaceOutcome, Store};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
