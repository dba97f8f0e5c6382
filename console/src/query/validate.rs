//! Runtime type-checking of untrusted condition JSON
//!
//! Anything arriving from the address bar or the backend goes through here
//! before it becomes a [`Condition`]. Invalid conditions are dropped and
//! logged, never raised.

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ConsoleError;
use crate::query::model::{Condition, ConditionKind, Filter, Query};

/// Check one candidate condition against the condition union.
///
/// The tag must name a known kind, `params` must carry exactly that kind's
/// fields with string values, and the operator must apply to the kind.
pub fn validate_condition(candidate: &Value) -> Result<Condition, ConsoleError> {
    let object = candidate
        .as_object()
        .ok_or_else(|| ConsoleError::ValidationError("condition is not an object".to_string()))?;

    let tag = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ConsoleError::ValidationError("missing condition type".to_string()))?;
    let kind: ConditionKind = tag.parse()?;

    if !object.get("params").is_some_and(Value::is_object) {
        return Err(ConsoleError::ValidationError(format!(
            "{} params must be an object",
            kind
        )));
    }

    let condition: Condition = serde_json::from_value(candidate.clone())
        .map_err(|e| ConsoleError::ValidationError(format!("{}: {}", kind, e)))?;

    if !kind.accepts(condition.operator()) {
        return Err(ConsoleError::ValidationError(format!(
            "operator '{}' does not apply to {}",
            condition.operator(),
            kind
        )));
    }

    Ok(condition)
}

/// Validate the candidate conditions of one filter.
///
/// Returns `None` when every candidate was invalid. An empty candidate list is
/// a valid empty filter.
pub fn validate_filter(candidates: &[Value]) -> Option<Filter> {
    let filter: Filter = candidates
        .iter()
        .filter_map(|candidate| match validate_condition(candidate) {
            Ok(condition) => Some(condition),
            Err(e) => {
                warn!("Dropping invalid condition: {}", e);
                None
            }
        })
        .collect();

    if filter.is_empty() && !candidates.is_empty() {
        debug!("Dropping filter left empty by validation");
        return None;
    }
    Some(filter)
}

/// Validate a whole query given as JSON, e.g. a scheduling rule from the API.
///
/// `null` is an empty query. Entries that are not arrays are dropped.
pub fn validate_query(candidate: &Value) -> Query {
    let filters = match candidate {
        Value::Null => return Query::default(),
        Value::Array(filters) => filters,
        other => {
            warn!("Ignoring query that is not an array: {}", other);
            return Query::default();
        }
    };

    filters
        .iter()
        .filter_map(|filter| match filter.as_array() {
            Some(candidates) => validate_filter(candidates),
            None => {
                warn!("Dropping filter that is not an array: {}", filter);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::model::Operator;
    use serde_json::json;

    #[test]
    fn test_valid_conditions() {
        let condition = validate_condition(&json!({
            "type": "DevicePropertyCondition",
            "params": { "property": "status", "operator": "is", "value": "offline" }
        }))
        .unwrap();
        assert_eq!(
            condition,
            Condition::device_property("status", Operator::Is, "offline")
        );

        let condition = validate_condition(&json!({
            "type": "LabelExistenceCondition",
            "params": { "key": "gpu", "operator": "does not exist" }
        }))
        .unwrap();
        assert_eq!(
            condition,
            Condition::label_existence("gpu", Operator::DoesNotExist)
        );
    }

    #[test]
    fn test_params_shape_mismatch() {
        let result = validate_condition(&json!({
            "type": "LabelValueCondition",
            "params": { "property": "status" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_extra_param_field_rejected() {
        let result = validate_condition(&json!({
            "type": "LabelExistenceCondition",
            "params": { "key": "gpu", "operator": "exists", "value": "yes" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_primitive_type_rejected() {
        let result = validate_condition(&json!({
            "type": "LabelValueCondition",
            "params": { "key": "replicas", "operator": "is", "value": 3 }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_kind_and_missing_tag() {
        assert!(validate_condition(&json!({ "type": "Nope", "params": {} })).is_err());
        assert!(validate_condition(&json!({ "params": { "key": "a" } })).is_err());
        assert!(validate_condition(&json!("LabelValueCondition")).is_err());
    }

    #[test]
    fn test_operator_must_fit_kind() {
        let result = validate_condition(&json!({
            "type": "LabelValueCondition",
            "params": { "key": "env", "operator": "exists", "value": "prod" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_drops_invalid_entries() {
        let filter = validate_filter(&[
            json!({ "type": "LabelExistenceCondition", "params": { "key": "gpu", "operator": "exists" } }),
            json!({ "type": "LabelValueCondition", "params": {} }),
        ])
        .unwrap();
        assert_eq!(filter.len(), 1);

        assert!(validate_filter(&[json!(42)]).is_none());
        assert_eq!(validate_filter(&[]), Some(Filter::default()));
    }

    #[test]
    fn test_query_from_json() {
        assert!(validate_query(&Value::Null).is_empty());
        assert!(validate_query(&json!({ "not": "an array" })).is_empty());

        let query = validate_query(&json!([
            [{ "type": "LabelValueCondition", "params": { "key": "env", "operator": "is", "value": "prod" } }],
            "garbage",
            [{ "type": "Unknown", "params": {} }]
        ]));
        assert_eq!(query.len(), 1);
    }
}
