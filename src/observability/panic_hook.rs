//! Panic hook that prints a crash report naming the comparison in flight.
//!
//! The comparison being evaluated is tracked per thread, so batch runs on
//! rayon workers report the pair that actually crashed.

use std::cell::RefCell;
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str = "================================================================";

thread_local! {
    static CURRENT_COMPARISON: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Clears the tracked comparison when dropped.
#[must_use = "the comparison is cleared when the guard is dropped"]
pub struct ComparisonGuard {
    previous: Option<String>,
}

impl Drop for ComparisonGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_COMPARISON.with(|c| *c.borrow_mut() = previous);
    }
}

/// Record the comparison this thread is evaluating.
pub fn set_current_comparison(label: impl Into<String>) -> ComparisonGuard {
    let label = label.into();
    let previous = CURRENT_COMPARISON.with(|c| c.borrow_mut().replace(label));
    ComparisonGuard { previous }
}

/// Comparison label tracked on this thread, if any.
pub fn current_comparison() -> Option<String> {
    CURRENT_COMPARISON.with(|c| c.borrow().clone())
}

/// Install the crash-report panic hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("{}", crash_report(info));
    }));
}

fn crash_report(info: &PanicHookInfo<'_>) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "DEBTMAP-VALIDATE CRASH REPORT".to_string(),
        format!("Version:  {}", VERSION),
        format!("Platform: {}", std::env::consts::OS),
        format!("Time:     {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        RULE.to_string(),
        format!("Panic:    {}", panic_message(info.payload())),
    ];

    if let Some(location) = info.location() {
        lines.push(format!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ));
    }

    match current_comparison() {
        Some(label) => lines.push(format!("Comparing: {}", label)),
        None => lines.push("Comparing: (no comparison started)".to_string()),
    }

    if std::env::var("RUST_BACKTRACE").is_ok() {
        lines.push(RULE.to_string());
        lines.push(std::backtrace::Backtrace::capture().to_string());
    } else {
        lines.push("Run with RUST_BACKTRACE=1 for a stack trace".to_string());
    }
    lines.push(RULE.to_string());
    lines.join("\n")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
