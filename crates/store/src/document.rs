//! Documents, queries and conversions between typed records and JSON.

use crate::error::{Result, StoreError};
use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// A stored JSON object plus its key and write counter.
///
/// `revision` starts at 1 on creation and is bumped by every write, so a
/// reader can hand it back to `replace_if_revision` to detect lost updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub revision: u64,
    /// Insertion order within the collection
    #[serde(default)]
    pub sequence: u64,
    pub data: Value,
}

impl Document {
    /// Deserialize into a record, filling its `id` field from the key
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut value = self.data.clone();
        if let Value::Object(map) = &mut value {
            map.insert("id".to_string(), Value::String(self.id.clone()));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

/// Decode a batch of documents, failing on the first bad one
pub fn decode_all<T: DeserializeOwned>(documents: &[Document]) -> Result<Vec<T>> {
    documents.iter().map(Document::decode).collect()
}

/// Serialize a record into document fields. The `id` field is dropped since
/// it lives in the document key.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Value> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(Value::Object(map))
        }
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

pub(crate) fn require_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Field equality condition
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn matches(&self, document: &Document) -> bool {
        document.field(&self.field) == Some(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filters, an optional sort field and an optional limit.
///
/// Without `order_by`, results come back in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.filters.iter().all(|filter| filter.matches(document))
    }

    /// Filter, sort and truncate a set of documents
    pub fn apply(&self, documents: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut results: Vec<Document> = documents
            .into_iter()
            .filter(|document| self.matches(document))
            .collect();

        results.sort_by_key(|document| document.sequence);
        if let Some((field, direction)) = &self.order_by {
            // stable sort keeps insertion order among equal keys
            results.sort_by(|a, b| {
                let ordering = compare_values(a.field(field), b.field(field));
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
        results
    }
}

/// Order JSON values for sorting. Timestamps compare chronologically, numbers
/// numerically, and missing values sort first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (parse_timestamp(x), parse_timestamp(y)) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, sequence: u64, data: Value) -> Document {
        Document {
            id: id.to_string(),
            revision: 1,
            sequence,
            data,
        }
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Subscriber {
        #[serde(default)]
        id: String,
        email: String,
    }

    #[test]
    fn test_decode_injects_id() {
        let document = doc("abc", 1, json!({"email": "a@b.co"}));
        let subscriber: Subscriber = document.decode().unwrap();
        assert_eq!(subscriber.id, "abc");
        assert_eq!(subscriber.email, "a@b.co");
    }

    #[test]
    fn test_to_fields_strips_id() {
        let fields = to_fields(&Subscriber {
            id: "abc".to_string(),
            email: "a@b.co".to_string(),
        })
        .unwrap();
        assert_eq!(fields, json!({"email": "a@b.co"}));
        assert!(to_fields(&42).is_err());
    }

    #[test]
    fn test_query_orders_timestamps_chronologically() {
        // fractional seconds must not break ordering
        let documents = vec![
            doc("a", 1, json!({"created_at": "2025-03-14T18:00:00Z"})),
            doc("b", 2, json!({"created_at": "2025-03-14T18:00:00.500Z"})),
            doc("c", 3, json!({"created_at": "2025-03-13T09:00:00Z"})),
        ];
        let results = Query::new()
            .order_by("created_at", Direction::Descending)
            .limit(2)
            .apply(documents);

        let ids: Vec<&str> = results.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_query_filters_by_equality() {
        let documents = vec![
            doc("a", 1, json!({"user_id": "u1", "status": "pending"})),
            doc("b", 2, json!({"user_id": "u2", "status": "pending"})),
            doc("c", 3, json!({"user_id": "u1", "status": "completed"})),
        ];
        let results = Query::new()
            .where_eq("user_id", "u1")
            .where_eq("status", "pending")
            .apply(documents);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "a");
    }

    #[test]
    fn test_unordered_query_keeps_insertion_order() {
        let documents = vec![
            doc("z", 1, json!({})),
            doc("a", 3, json!({})),
            doc("m", 2, json!({})),
        ];
        let ids: Vec<String> = Query::new().apply(documents).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["z", "m", "a"]);
    }
}
