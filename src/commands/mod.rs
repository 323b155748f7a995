pub mod batch;
pub mod validate;

pub use batch::{run_batch, BatchConfig, BatchOutcome};
pub use validate::{validate_improvement, ValidateConfig};
