//! Document and query shapes shared by every remote store implementation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// JSON object holding a document's fields.
pub type Fields = serde_json::Map<String, Value>;

/// Reserved field name that addresses the document id in a filter.
pub const DOCUMENT_ID_FIELD: &str = "__name__";

/// A stored document: its store-assigned id and its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Value of a field, or the id when `field` is [`DOCUMENT_ID_FIELD`].
    pub fn field(&self, field: &str) -> Option<Value> {
        if field == DOCUMENT_ID_FIELD {
            Some(Value::String(self.id.clone()))
        } else {
            self.fields.get(field).cloned()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn matches(&self, doc: &Document) -> bool {
        doc.field(&self.field).as_ref() == Some(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Either an equality filter, or an ordering with a limit, or nothing
/// (the whole collection).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FieldFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn where_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            filter: Some(FieldFilter {
                field: field.into(),
                value: value.into(),
            }),
            ..Self::default()
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self::where_eq(DOCUMENT_ID_FIELD, id.into())
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluates the query over an in-memory collection.
    pub fn apply(&self, docs: &[Document]) -> Vec<Document> {
        let mut matched: Vec<Document> = docs
            .iter()
            .filter(|doc| match &self.filter {
                Some(filter) => filter.matches(doc),
                None => true,
            })
            .cloned()
            .collect();

        if let Some(order) = &self.order_by {
            // stable sort keeps insertion order among equal keys
            matched.sort_by(|a, b| {
                let ord = compare_values(a.field(&order.field), b.field(&order.field));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

/// Orders missing values first; mixed types compare by kind.
fn compare_values(a: Option<Value>, b: Option<Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(&y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(&y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => rank(&x).cmp(&rank(&y)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
