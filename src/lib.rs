// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod errors;
pub mod io;
pub mod observability;
pub mod output;
pub mod snapshot;
pub mod validation;

// Re-export commonly used types
pub use crate::comparison::{compare_snapshots, ComparisonResult};
pub use crate::config::ValidationConfig;
pub use crate::errors::ValidateError;
pub use crate::snapshot::{parse_snapshot, DebtItem, ItemIdentity, Snapshot};
pub use crate::validation::{validate_snapshots, Status, ValidationReport};
