//! Schema normalization: decode any known report shape into [`DebtItem`]s.
//!
//! The document shape is chosen once, by checking container keys in a fixed
//! priority order:
//!
//! 1. `items` whose entries are tagged (`{"Function": {..}}` or
//!    `{"type": "Function", ..}`) → [`SchemaKind::TaggedUnion`]
//! 2. `items` with flat entries carrying `unified_score` / `location`
//!    → [`SchemaKind::UnifiedItems`]
//! 3. `debt_items` → [`SchemaKind::DebtItems`]
//! 4. `functions` → [`SchemaKind::LegacyFunctions`]
//!
//! Inside a document, optional fields never fail decoding: each one has a
//! fallback chain ending in a default. Only an unrecognizable document is
//! rejected.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{sanitize_score, DebtItem, ItemIdentity, Snapshot};
use crate::errors::{Result, ValidateError};

/// Known report shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    TaggedUnion,
    UnifiedItems,
    DebtItems,
    LegacyFunctions,
}

/// Variant tags of the tagged-union shape
const TAGGED_VARIANTS: [&str; 3] = ["File", "Function", "Module"];

/// Parse JSON text and normalize it into a snapshot.
pub fn parse_snapshot(source_name: &str, text: &str) -> Result<Snapshot> {
    let doc: Value = serde_json::from_str(text)
        .map_err(|e| ValidateError::schema(source_name, format!("invalid JSON: {}", e)))?;
    normalize_document(source_name, &doc)
}

/// Identify the schema of a parsed document and return its item container.
pub fn detect_schema(doc: &Value) -> std::result::Result<(SchemaKind, &[Value]), String> {
    let root = doc
        .as_object()
        .ok_or_else(|| "document root is not a JSON object".to_string())?;

    if let Some(items) = root.get("items") {
        let entries = container(items, "items")?;
        let kind = if entries.iter().any(|e| tagged_variant(e).is_some()) {
            SchemaKind::TaggedUnion
        } else {
            SchemaKind::UnifiedItems
        };
        return Ok((kind, entries));
    }
    if let Some(items) = root.get("debt_items") {
        return Ok((SchemaKind::DebtItems, container(items, "debt_items")?));
    }
    if let Some(functions) = root.get("functions") {
        return Ok((
            SchemaKind::LegacyFunctions,
            container(functions, "functions")?,
        ));
    }

    Err("missing item container (expected 'items', 'debt_items' or 'functions')".to_string())
}

fn container<'a>(value: &'a Value, key: &str) -> std::result::Result<&'a [Value], String> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| format!("'{}' is not an array", key))
}

/// Normalize an already parsed document.
pub fn normalize_document(source_name: &str, doc: &Value) -> Result<Snapshot> {
    let (kind, entries) =
        detect_schema(doc).map_err(|message| ValidateError::schema(source_name, message))?;

    let items: Vec<DebtItem> = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let decoded = decode_entry(kind, entry);
            if decoded.is_none() {
                if entry.is_object() {
                    debug!(
                        source = source_name,
                        index = idx,
                        record = %entry,
                        "Dropping entry without positive score"
                    );
                } else {
                    warn!(source = source_name, index = idx, "Skipping non-object report entry");
                }
            }
            decoded
        })
        .collect();

    debug!(
        source = source_name,
        schema = ?kind,
        entries = entries.len(),
        items = items.len(),
        "Normalized snapshot"
    );

    let mut snapshot = Snapshot::new(source_name, kind, items);
    snapshot.reported_total = reported_total(doc);
    Ok(snapshot)
}

fn decode_entry(kind: SchemaKind, entry: &Value) -> Option<DebtItem> {
    let object = entry.as_object()?;
    match kind {
        SchemaKind::TaggedUnion => Some(match tagged_variant(entry) {
            Some((variant, body)) => decode_tagged(variant, body),
            None => decode_flat(object),
        }),
        SchemaKind::UnifiedItems | SchemaKind::DebtItems => Some(decode_flat(object)),
        SchemaKind::LegacyFunctions => decode_legacy(object),
    }
}

// =============================================================================
// Variant Decoders
// =============================================================================

/// Recognize an externally or internally tagged entry.
fn tagged_variant(entry: &Value) -> Option<(&'static str, &Map<String, Value>)> {
    let object = entry.as_object()?;

    if let Some(tag) = object.get("type").and_then(Value::as_str) {
        return TAGGED_VARIANTS
            .iter()
            .copied()
            .find(|v| *v == tag)
            .map(|v| (v, object));
    }

    if object.len() == 1 {
        let (key, body) = object.iter().next()?;
        let variant = TAGGED_VARIANTS
            .iter()
            .copied()
            .find(|v| *v == key.as_str())?;
        return body.as_object().map(|body| (variant, body));
    }

    None
}

fn decode_tagged(variant: &str, body: &Map<String, Value>) -> DebtItem {
    match variant {
        "Function" => decode_flat(body),
        _ => decode_container(variant, body),
    }
}

/// File- and module-level entries: identity is the path, plus the module name.
fn decode_container(variant: &str, body: &Map<String, Value>) -> DebtItem {
    let file = first_str(
        body,
        &[
            &["metrics", "path"],
            &["location", "file"],
            &["path"],
            &["file"],
        ],
    )
    .unwrap_or("unknown");
    let function = if variant == "Module" {
        first_str(body, &[&["name"], &["module"], &["location", "function"]]).unwrap_or("")
    } else {
        ""
    };

    let identity = ItemIdentity::new(file, function, None);
    fill_common(DebtItem::new(identity, extract_score(body)), body)
        .with_category_default(match variant {
            "Module" => "organization",
            _ => "file",
        })
}

/// Function-level entries with a `location` object or string.
fn decode_flat(body: &Map<String, Value>) -> DebtItem {
    let identity = match body.get("location") {
        Some(Value::String(location)) => ItemIdentity::parse_location(location),
        Some(Value::Object(location)) => ItemIdentity::new(
            location.get("file").and_then(Value::as_str).unwrap_or("unknown"),
            location
                .get("function")
                .and_then(Value::as_str)
                .unwrap_or(""),
            location.get("line").and_then(as_line),
        ),
        _ => ItemIdentity::new(
            str_field(body, "file").unwrap_or("unknown"),
            first_str(body, &[&["function"], &["name"]]).unwrap_or(""),
            body.get("line").and_then(as_line),
        ),
    };

    fill_common(DebtItem::new(identity, extract_score(body)), body)
}

/// Legacy per-function rows. Rows without a positive score are not debt.
fn decode_legacy(row: &Map<String, Value>) -> Option<DebtItem> {
    let score = first_number(row, &[&["debt_score"], &["score"]])
        .map(sanitize_score)
        .unwrap_or_else(|| complexity_fallback_score(row));
    if score <= 0.0 {
        return None;
    }

    let identity = ItemIdentity::new(
        str_field(row, "file").unwrap_or("unknown"),
        str_field(row, "name").unwrap_or("unknown"),
        row.get("line").and_then(as_line),
    );
    Some(fill_common(DebtItem::new(identity, score), row).with_category_default("complexity"))
}

// =============================================================================
// Field Extraction
// =============================================================================

fn fill_common(mut item: DebtItem, body: &Map<String, Value>) -> DebtItem {
    item.complexity = sanitize_score(extract_complexity(body));
    item.coverage = extract_coverage(body);
    item.description = extract_description(body);
    for category in extract_categories(body) {
        item = item.with_category(category);
    }
    item
}

/// Unified score, else the largest complexity-like metric, else 0.
fn extract_score(body: &Map<String, Value>) -> f64 {
    first_number(
        body,
        &[
            &["unified_score", "final_score"],
            &["score"],
            &["debt_score"],
            &["final_score"],
        ],
    )
    .map(sanitize_score)
    .unwrap_or_else(|| complexity_fallback_score(body))
}

const COMPLEXITY_METRIC_PATHS: [&[&str]; 6] = [
    &["cyclomatic_complexity"],
    &["cognitive_complexity"],
    &["complexity"],
    &["metrics", "cyclomatic_complexity"],
    &["metrics", "cognitive_complexity"],
    &["metrics", "max_complexity"],
];

fn complexity_fallback_score(body: &Map<String, Value>) -> f64 {
    let direct = COMPLEXITY_METRIC_PATHS
        .iter()
        .filter_map(|path| lookup(body, path).and_then(as_number));

    let nested = debt_type_variants(body).flat_map(|(_, fields)| {
        ["cyclomatic", "cognitive"]
            .into_iter()
            .filter_map(move |key| fields.get(key).and_then(as_number))
    });

    direct
        .chain(nested)
        .map(sanitize_score)
        .fold(0.0, f64::max)
}

/// Direct cyclomatic field, else the complexity hotspot sub-structure, else 0.
fn extract_complexity(body: &Map<String, Value>) -> f64 {
    if let Some(direct) = first_number(
        body,
        &[
            &["cyclomatic_complexity"],
            &["metrics", "cyclomatic_complexity"],
            &["complexity"],
            &["metrics", "max_complexity"],
        ],
    ) {
        return direct;
    }

    let mut variants: Vec<_> = debt_type_variants(body).collect();
    // Prefer the hotspot record when several variants carry a cyclomatic count
    variants.sort_by_key(|(name, _)| *name != "ComplexityHotspot");
    variants
        .into_iter()
        .find_map(|(_, fields)| fields.get("cyclomatic").and_then(as_number))
        .unwrap_or(0.0)
}

/// `100 - coverage_factor * 10` when a factor is reported, else a direct
/// percentage, else `None` (callers assume full coverage).
fn extract_coverage(body: &Map<String, Value>) -> Option<f64> {
    if let Some(factor) = lookup(body, &["unified_score", "coverage_factor"]).and_then(as_number) {
        return Some((100.0 - factor * 10.0).clamp(0.0, 100.0));
    }
    body.get("coverage")
        .and_then(as_number)
        .map(|pct| pct.clamp(0.0, 100.0))
}

fn extract_description(body: &Map<String, Value>) -> Option<String> {
    let text = match body.get("recommendation") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Object(rec)) => rec
            .get("primary_action")
            .or_else(|| rec.get("action"))
            .and_then(Value::as_str),
        _ => None,
    }
    .or_else(|| str_field(body, "description"))?;

    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn extract_categories(body: &Map<String, Value>) -> Vec<String> {
    let mut tags = Vec::new();

    match body.get("debt_type") {
        Some(Value::String(name)) => tags.push(category_tag(name)),
        Some(Value::Object(variants)) => tags.extend(variants.keys().map(|k| category_tag(k))),
        _ => {}
    }
    if let Some(category) = str_field(body, "category").or_else(|| str_field(body, "type")) {
        if !TAGGED_VARIANTS.contains(&category) {
            tags.push(category_tag(category));
        }
    }
    if let Some(Value::Array(list)) = body.get("categories") {
        tags.extend(list.iter().filter_map(Value::as_str).map(category_tag));
    }

    tags
}

/// Map a report's debt type name onto the open category set.
pub fn category_tag(name: &str) -> String {
    match name {
        "ComplexityHotspot" | "Complexity" | "ComplexFunction" | "TestComplexity"
        | "TestComplexityHotspot" => "complexity".to_string(),
        "TestingGap" | "CoverageGap" => "coverage_gap".to_string(),
        "Duplication" | "DuplicateCode" => "duplication".to_string(),
        "Dependency" | "CircularDependency" | "HighCoupling" => "dependency".to_string(),
        "Todo" | "Fixme" | "Documentation" => "documentation".to_string(),
        other => to_snake_case(other),
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.trim().chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else if ch == ' ' || ch == '-' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// `debt_type` variants of the externally tagged form: `{"Name": {fields}}`.
fn debt_type_variants(
    body: &Map<String, Value>,
) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
    body.get("debt_type")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|variants| variants.iter())
        .filter_map(|(name, fields)| fields.as_object().map(|f| (name.as_str(), f)))
}

fn reported_total(doc: &Value) -> Option<f64> {
    let root = doc.as_object()?;
    first_number(
        root,
        &[
            &["total_debt_score"],
            &["summary", "total_debt_score"],
            &["summary", "total_score"],
        ],
    )
}

// =============================================================================
// JSON Helpers
// =============================================================================

fn lookup<'a>(body: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(body.get(*first)?, |value, key| value.get(*key))
}

/// A finite number, or a `{"value": n}` newtype wrapper.
fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(inner) => inner.get("value").and_then(Value::as_f64),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn as_line(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|n| usize::try_from(n).ok())
}

fn first_number(body: &Map<String, Value>, paths: &[&[&str]]) -> Option<f64> {
    paths
        .iter()
        .find_map(|path| lookup(body, path).and_then(as_number))
}

fn first_str<'a>(body: &'a Map<String, Value>, paths: &[&[&str]]) -> Option<&'a str> {
    paths
        .iter()
        .find_map(|path| lookup(body, path).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}

fn str_field<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

impl DebtItem {
    fn with_category_default(self, category: &str) -> Self {
        if self.categories.is_empty() {
            self.with_category(category)
        } else {
            self
        }
    }
}
