use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use super::{Month, WikiSource};
use crate::error::Result;

/// Month → opaque section index on the year page. Months the page lacks are absent.
pub type MonthSectionMap = BTreeMap<Month, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub index: String,
}

impl TocEntry {
    /// Read a `{ "line": .., "index": .. }` leaf. The index may arrive as text or a number.
    fn from_leaf(leaf: &Value) -> Option<TocEntry> {
        let obj = leaf.as_object()?;
        let title = obj.get("line")?.as_str()?.to_string();
        let index = match obj.get("index")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(TocEntry { title, index })
    }
}

/// Flatten whatever shape `tocdata` came back in into one ordered entry list.
///
/// A sequence is used as-is. A mapping contributes its sequence values by
/// concatenation and its single-entry values one at a time, in key order;
/// anything else is dropped.
pub fn normalize_toc(toc: &Value) -> Vec<TocEntry> {
    let leaves: Vec<&Value> = match toc {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map
            .values()
            .flat_map(|value| match value {
                Value::Array(items) => items.iter().collect::<Vec<_>>(),
                Value::Object(_) => vec![value],
                _ => Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    };

    leaves.into_iter().filter_map(TocEntry::from_leaf).collect()
}

/// Keep entries titled exactly like a month. A repeated month keeps its last index.
pub fn month_sections(entries: &[TocEntry]) -> MonthSectionMap {
    let mut months = MonthSectionMap::new();
    for entry in entries {
        if let Some(month) = Month::from_title(&entry.title) {
            months.insert(month, entry.index.clone());
        }
    }
    months
}

/// One table-of-contents lookup for `year`, reduced to its month sections.
pub async fn resolve_month_sections(source: &dyn WikiSource, year: i32) -> Result<MonthSectionMap> {
    let toc = source.table_of_contents(year).await?;
    let entries = normalize_toc(&toc);
    let months = month_sections(&entries);
    debug!(
        "TOC for {}: {} entries, {} month sections",
        year,
        entries.len(),
        months.len()
    );
    Ok(months)
}

// ── Tests ──
