//! Canonical debt item model shared by every comparison stage.
//!
//! Reports arrive in several incompatible shapes; [`normalize`] decodes each of
//! them into a [`Snapshot`] of [`DebtItem`]s. A snapshot is immutable once
//! loaded and lives for a single comparison run.

pub mod normalize;

pub use normalize::{detect_schema, normalize_document, parse_snapshot, SchemaKind};

use serde::Serialize;
use std::fmt;

use crate::config::{MatchSensitivity, Priority, PriorityThresholds};

/// Location of a debt item as reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ItemIdentity {
    pub file: String,
    /// Enclosing function or module name; empty for file-level items
    pub function: String,
    pub line: Option<usize>,
}

impl ItemIdentity {
    pub fn new(file: impl AsRef<str>, function: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            file: normalize_path_str(file.as_ref()),
            function: function.into(),
            line,
        }
    }

    /// Project this identity onto the fields used for matching.
    pub fn key(&self, sensitivity: MatchSensitivity) -> IdentityKey {
        IdentityKey {
            file: self.file.clone(),
            function: self.function.clone(),
            line: match sensitivity {
                MatchSensitivity::Exact => self.line,
                MatchSensitivity::Function => None,
            },
        }
    }

    /// Parse a `file[:function[:line]]` location string.
    ///
    /// Function names may contain `::` path separators; only a lone `:`
    /// separates the file from the function.
    pub fn parse_location(location: &str) -> Self {
        let (rest, line) = match location.rsplit_once(':') {
            Some((head, tail)) if !head.ends_with(':') => match tail.parse::<usize>() {
                Ok(line) => (head, Some(line)),
                Err(_) => (location, None),
            },
            _ => (location, None),
        };

        match find_field_separator(rest) {
            Some(idx) => {
                let function = &rest[idx + 1..];
                let function = if function == "*" { "" } else { function };
                Self::new(&rest[..idx], function, line)
            }
            None => Self::new(rest, "", line),
        }
    }
}

impl fmt::Display for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_location(f, &self.file, &self.function, self.line)
    }
}

/// Position of the first `:` that is not part of a `::` path separator.
fn find_field_separator(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (0..bytes.len()).find(|&i| {
        bytes[i] == b':'
            && bytes.get(i + 1) != Some(&b':')
            && (i == 0 || bytes[i - 1] != b':')
    })
}

fn write_location(
    f: &mut fmt::Formatter<'_>,
    file: &str,
    function: &str,
    line: Option<usize>,
) -> fmt::Result {
    match (function.is_empty(), line) {
        (true, None) => write!(f, "{}", file),
        (true, Some(line)) => write!(f, "{}:*:{}", file, line),
        (false, None) => write!(f, "{}:{}", file, function),
        (false, Some(line)) => write!(f, "{}:{}:{}", file, function, line),
    }
}

/// Normalize a path string for comparison
fn normalize_path_str(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").unwrap_or(&path).to_string()
}

/// Matching key: an [`ItemIdentity`] projected by a [`MatchSensitivity`].
///
/// Ordering is lexicographic over (file, function, line), which keeps every
/// keyed collection in the pipeline deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IdentityKey {
    pub file: String,
    pub function: String,
    pub line: Option<usize>,
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_location(f, &self.file, &self.function, self.line)
    }
}

/// One reported unit of technical debt after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtItem {
    pub identity: ItemIdentity,
    /// Unified debt score; never negative
    pub score: f64,
    pub complexity: f64,
    /// Coverage percentage, when the report carries one
    pub coverage: Option<f64>,
    /// Debt category tags, deduplicated, in report order
    pub categories: Vec<String>,
    pub description: Option<String>,
}

impl DebtItem {
    pub fn new(identity: ItemIdentity, score: f64) -> Self {
        Self {
            identity,
            score: sanitize_score(score),
            complexity: 0.0,
            coverage: None,
            categories: Vec::new(),
            description: None,
        }
    }

    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = sanitize_score(complexity);
        self
    }

    pub fn with_coverage(mut self, coverage: f64) -> Self {
        self.coverage = Some(coverage.clamp(0.0, 100.0));
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(&self, thresholds: &PriorityThresholds) -> Priority {
        thresholds.classify(self.score)
    }

    pub fn coverage_or(&self, assumed: f64) -> f64 {
        self.coverage.unwrap_or(assumed)
    }
}

/// Clamp a reported number into a valid non-negative score.
pub(crate) fn sanitize_score(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// All debt items reported by one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Name used in diagnostics (usually the file path)
    pub source_name: String,
    pub schema: SchemaKind,
    pub items: Vec<DebtItem>,
    /// Total score as stated by the report itself, if any
    pub reported_total: Option<f64>,
}

impl Snapshot {
    pub fn new(source_name: impl Into<String>, schema: SchemaKind, items: Vec<DebtItem>) -> Self {
        Self {
            source_name: source_name.into(),
            schema,
            items,
            reported_total: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
