//! Read-only rendering of queries as labels and chips

use std::fmt;

use serde_json::Value;

use crate::query::model::{Condition, Filter, Query};
use crate::query::validate::validate_condition;

/// Shown in place of a condition that cannot be rendered
pub const RENDER_ERROR_LABEL: &str = "Error rendering label";

/// Shown in place of a filter with no conditions
pub const EMPTY_FILTER_LABEL: &str = "(no conditions)";

/// Human-readable label of a condition, e.g. `env is prod`
pub fn condition_label(condition: &Condition) -> String {
    match condition {
        Condition::DeviceProperty(p) => format!("{} {} {}", p.property, p.operator, p.value),
        Condition::LabelValue(p) => format!("{} {} {}", p.key, p.operator, p.value),
        Condition::LabelExistence(p) => format!("{} {}", p.key, p.operator),
    }
}

/// Label of a condition that has not been validated yet
pub fn raw_condition_label(candidate: &Value) -> String {
    match validate_condition(candidate) {
        Ok(condition) => condition_label(&condition),
        Err(_) => RENDER_ERROR_LABEL.to_string(),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&condition_label(self))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(EMPTY_FILTER_LABEL);
        }
        let labels: Vec<String> = self.iter().map(condition_label).collect();
        f.write_str(&labels.join(" OR "))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|filter| {
                if self.len() > 1 && filter.len() > 1 {
                    format!("({})", filter)
                } else {
                    filter.to_string()
                }
            })
            .collect();
        f.write_str(&parts.join(" AND "))
    }
}

/// Request from a chip to remove the filter it displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveFilter {
    pub index: usize,
}

/// One filter rendered as a pill of OR-joined condition labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    /// Position of the filter in its query
    pub index: usize,
    pub labels: Vec<String>,
    pub removable: bool,
}

impl FilterChip {
    pub fn text(&self) -> String {
        if self.labels.is_empty() {
            return EMPTY_FILTER_LABEL.to_string();
        }
        self.labels.join(" OR ")
    }

    /// Removal request for the caller to apply, if this chip can be removed
    pub fn remove_request(&self) -> Option<RemoveFilter> {
        self.removable.then_some(RemoveFilter { index: self.index })
    }
}

/// Render each filter of `query` as a chip
pub fn render_chips(query: &Query, removable: bool) -> Vec<FilterChip> {
    query
        .iter()
        .enumerate()
        .map(|(index, filter)| FilterChip {
            index,
            labels: filter.iter().map(condition_label).collect(),
            removable,
        })
        .collect()
}

/// Render filters that were never validated; bad conditions get a placeholder
pub fn render_raw_chips(filters: &[Vec<Value>], removable: bool) -> Vec<FilterChip> {
    filters
        .iter()
        .enumerate()
        .map(|(index, candidates)| FilterChip {
            index,
            labels: candidates.iter().map(raw_condition_label).collect(),
            removable,
        })
        .collect()
}
