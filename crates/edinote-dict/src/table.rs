//! Structural and code-value tables.
//!
//! Dictionary JSON found in the wild comes in a few shapes. Decoding is
//! lenient: element entries may be plain strings or
//! `{ "name": ..., "qualifiers": { code: meaning } }` objects (optionally
//! nested under `"elements"`), element keys are zero-padded to two digits,
//! and non-string leaves are ignored rather than failing the whole table.

use crate::{DictError, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Sentinel returned when an element has no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Name of the fallback entry in the structural table.
pub const DEFAULT_ENTRY: &str = "default";

/// Element key holding a segment's own description.
pub const SEGMENT_KEY: &str = "00";

/// Normalize an element position key: `"1"` → `"01"`, non-numeric keys kept as-is.
pub fn pad_index(raw: &str) -> String {
    let raw = raw.trim();
    match raw.parse::<usize>() {
        Ok(n) => format!("{n:02}"),
        Err(_) => raw.to_string(),
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_uppercase()
}

// ============================================================================
// Structural table
// ============================================================================

/// Segment tag → element key → description.
#[derive(Debug, Clone, Default)]
pub struct StructuralTable {
    segments: HashMap<String, BTreeMap<String, String>>,
}

impl StructuralTable {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(|source| DictError::Json {
            table: "structural",
            source,
        })?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let root = value.as_object().ok_or_else(|| DictError::Shape {
            table: "structural",
            reason: "top level must be an object keyed by segment tag".to_string(),
        })?;

        let mut segments = HashMap::new();
        for (tag, entry) in root {
            let key = if tag == DEFAULT_ENTRY {
                tag.clone()
            } else {
                normalize_tag(tag)
            };
            let elements = flatten_segment(entry);
            if !elements.is_empty() {
                segments.insert(key, elements);
            }
        }

        segments
            .entry(DEFAULT_ENTRY.to_string())
            .or_insert_with(|| {
                BTreeMap::from([(SEGMENT_KEY.to_string(), NO_DESCRIPTION.to_string())])
            });

        Ok(Self { segments })
    }

    pub fn segment(&self, tag: &str) -> Option<&BTreeMap<String, String>> {
        self.segments.get(tag)
    }

    /// Description for `(tag, key)`; both must already be normalized.
    pub fn element(&self, tag: &str, key: &str) -> Option<&str> {
        self.segments
            .get(tag)
            .and_then(|elements| elements.get(key))
            .map(String::as_str)
    }

    /// A segment's own description, stored under the `"00"` key.
    pub fn segment_description(&self, tag: &str) -> Option<&str> {
        self.element(tag, SEGMENT_KEY)
    }

    pub fn default_description(&self) -> Option<&str> {
        self.element(DEFAULT_ENTRY, SEGMENT_KEY)
    }

    /// Number of segment tags, not counting the `default` entry.
    pub fn segment_count(&self) -> usize {
        self.segments
            .keys()
            .filter(|k| k.as_str() != DEFAULT_ENTRY)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.segment_count() == 0
    }
}

fn flatten_segment(entry: &Value) -> BTreeMap<String, String> {
    let container = entry
        .get("elements")
        .filter(|v| v.is_object())
        .unwrap_or(entry);
    let Some(elements) = container.as_object() else {
        return BTreeMap::new();
    };

    elements
        .iter()
        .filter_map(|(position, value)| {
            let description = match value {
                Value::String(s) => s.clone(),
                Value::Object(_) => flatten_detailed(value)?,
                _ => return None,
            };
            Some((pad_index(position), description))
        })
        .collect()
}

/// `{ name, qualifiers }` → `"name (code=meaning, ...)"`.
fn flatten_detailed(value: &Value) -> Option<String> {
    let name = value.get("name").and_then(Value::as_str).unwrap_or_default();
    let qualifiers: Vec<String> = value
        .get("qualifiers")
        .and_then(Value::as_object)
        .map(|q| {
            q.iter()
                .filter_map(|(code, meaning)| meaning.as_str().map(|m| format!("{code}={m}")))
                .collect()
        })
        .unwrap_or_default();

    let text = if qualifiers.is_empty() {
        name.trim().to_string()
    } else {
        format!("{name} ({})", qualifiers.join(", ")).trim().to_string()
    };
    (!text.is_empty()).then_some(text)
}

// ============================================================================
// Code-value table
// ============================================================================

/// Segment tag → element key → coded value → meaning.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    codes: HashMap<String, HashMap<String, HashMap<String, String>>>,
}

impl CodeTable {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(|source| DictError::Json {
            table: "code-value",
            source,
        })?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let root = value.as_object().ok_or_else(|| DictError::Shape {
            table: "code-value",
            reason: "top level must be an object keyed by segment tag".to_string(),
        })?;

        let mut codes: HashMap<String, HashMap<String, HashMap<String, String>>> = HashMap::new();
        for (tag, positions) in root {
            let Some(positions) = positions.as_object() else {
                continue;
            };
            for (position, values) in positions {
                let Some(values) = values.as_object() else {
                    continue;
                };
                let meanings: HashMap<String, String> = values
                    .iter()
                    .filter_map(|(code, meaning)| {
                        meaning
                            .as_str()
                            .filter(|m| !m.is_empty())
                            .map(|m| (code.trim().to_string(), m.to_string()))
                    })
                    .collect();
                if meanings.is_empty() {
                    continue;
                }
                codes
                    .entry(normalize_tag(tag))
                    .or_default()
                    .insert(pad_index(position), meanings);
            }
        }

        Ok(Self { codes })
    }

    /// Meaning of `value` at `(tag, index)`; `None` when any level is missing.
    pub fn lookup(&self, tag: &str, index: &str, value: &str) -> Option<&str> {
        self.codes
            .get(&normalize_tag(tag))?
            .get(&pad_index(index))?
            .get(value.trim())
            .map(String::as_str)
    }

    /// All coded values known for `(tag, index)`, sorted by code.
    pub fn values_for(&self, tag: &str, index: &str) -> Vec<(&str, &str)> {
        let mut values: Vec<(&str, &str)> = self
            .codes
            .get(&normalize_tag(tag))
            .and_then(|positions| positions.get(&pad_index(index)))
            .map(|m| m.iter().map(|(c, d)| (c.as_str(), d.as_str())).collect())
            .unwrap_or_default();
        values.sort_unstable();
        values
    }

    pub fn segment_count(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
