//! Metadata filter trees (§4.1.1, §9). Replaces a dynamically-typed filter
//! dict with a tagged variant that is validated as it is constructed, so a
//! tree that parses is already known-valid.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A metadata filter: either a leaf matcher or a composite of other
/// filters. `Not` always wraps exactly one child; `And`/`Or` always wrap a
/// non-empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Filter {
    Leaf(HashMap<String, Value>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    #[must_use]
    pub fn leaf(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = HashMap::new();
        map.insert(key.into(), value.into());
        Filter::Leaf(map)
    }
}

/// Parse and validate a raw JSON filter tree in one pass (§4.1.1, §9).
///
/// Rules:
/// - A filter is a mapping; the only recognized operator keys are `AND`,
///   `OR`, `NOT`.
/// - `AND`/`OR` values must be non-empty lists of filter mappings.
/// - `NOT` must be a single filter mapping, not a list.
/// - Operator maps must not be empty.
/// - Leaves (plain scalar matchers) are not further validated here;
///   providers may reject them.
pub fn validate_metadata_filter(raw: &Value) -> Result<Filter, Error> {
    parse_at("$", raw)
}

fn parse_at(path: &str, raw: &Value) -> Result<Filter, Error> {
    let Some(obj) = raw.as_object() else {
        return Err(Error::InvalidFilter {
            path: path.to_string(),
            reason: "filter must be a mapping".to_string(),
        });
    };

    if obj.is_empty() {
        return Err(Error::InvalidFilter {
            path: path.to_string(),
            reason: "filter mapping must not be empty".to_string(),
        });
    }

    if let Some(v) = obj.get("AND") {
        return parse_list_operator(&format!("{path}.AND"), v).map(Filter::And);
    }
    if let Some(v) = obj.get("OR") {
        return parse_list_operator(&format!("{path}.OR"), v).map(Filter::Or);
    }
    if let Some(v) = obj.get("NOT") {
        let child_path = format!("{path}.NOT");
        let Some(child_obj) = v.as_object() else {
            return Err(Error::InvalidFilter {
                path: child_path,
                reason: "NOT must be a single filter mapping, not a list".to_string(),
            });
        };
        let _ = child_obj;
        let child = parse_at(&child_path, v)?;
        return Ok(Filter::Not(Box::new(child)));
    }

    // No operator key present: this is a leaf matcher.
    let leaf: HashMap<String, Value> = obj.clone().into_iter().collect();
    Ok(Filter::Leaf(leaf))
}

fn parse_list_operator(path: &str, v: &Value) -> Result<Vec<Filter>, Error> {
    let Some(items) = v.as_array() else {
        return Err(Error::InvalidFilter {
            path: path.to_string(),
            reason: "must be a non-empty list of filters".to_string(),
        });
    };
    if items.is_empty() {
        return Err(Error::InvalidFilter {
            path: path.to_string(),
            reason: "must be a non-empty list of filters".to_string(),
        });
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_at(&format!("{path}[{i}]"), item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_simple_leaf() {
        let raw = json!({"category": "pattern"});
        let filter = validate_metadata_filter(&raw).unwrap();
        assert!(matches!(filter, Filter::Leaf(_)));
    }

    #[test]
    fn accepts_nested_and_or() {
        let raw = json!({"AND": [{"category": "pattern"}, {"OR": [{"tag": "auth"}, {"tag": "api"}]}]});
        let filter = validate_metadata_filter(&raw).unwrap();
        match filter {
            Filter::And(items) => assert_eq!(items.len(), 2),
            _ => panic!("expected AND"),
        }
    }

    #[test]
    fn rejects_empty_and_list() {
        let raw = json!({"AND": []});
        let err = validate_metadata_filter(&raw).unwrap_err();
        match err {
            Error::InvalidFilter { path, .. } => assert_eq!(path, "$.AND"),
            _ => panic!("expected InvalidFilter"),
        }
    }

    #[test]
    fn rejects_empty_or_list() {
        let raw = json!({"OR": []});
        assert!(validate_metadata_filter(&raw).is_err());
    }

    #[test]
    fn rejects_not_with_list() {
        let raw = json!({"NOT": [{"category": "pattern"}]});
        let err = validate_metadata_filter(&raw).unwrap_err();
        match err {
            Error::InvalidFilter { reason, .. } => assert!(reason.contains("single")),
            _ => panic!("expected InvalidFilter"),
        }
    }

    #[test]
    fn rejects_non_mapping_operand() {
        let raw = json!({"AND": [1, 2]});
        assert!(validate_metadata_filter(&raw).is_err());
    }

    #[test]
    fn rejects_top_level_non_mapping() {
        let raw = json!("not a filter");
        assert!(validate_metadata_filter(&raw).is_err());
    }

    #[test]
    fn accepts_not_with_single_mapping() {
        let raw = json!({"NOT": {"category": "pattern"}});
        let filter = validate_metadata_filter(&raw).unwrap();
        assert!(matches!(filter, Filter::Not(_)));
    }
}
