//! Logging setup and crash reporting.
//!
//! - **Tracing**: `fmt` subscriber on stderr, filtered by `RUST_LOG` or the
//!   `-v` count, so reports written to stdout stay machine-readable
//! - **Panic Hook**: structured crash report naming the comparison in flight

pub mod panic_hook;
pub mod setup;

pub use panic_hook::{
    current_comparison, install_panic_hook, set_current_comparison, ComparisonGuard,
};
pub use setup::{default_filter, init_tracing};
