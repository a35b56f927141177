//! Query values: predicates and ordering.
//!
//! A [`Query`] only describes what to fetch; [`crate::Repository::execute`]
//! runs it.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::{Document, FieldPath};

/// Comparison applied by a [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Field equals the value. Numbers compare by numeric value.
    Eq,
    /// Field is greater than or equal to the value. Defined for two numbers
    /// or two strings; any other pairing never matches.
    Gte,
}

/// One filter clause: `path <operator> value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Field the clause reads.
    pub path: FieldPath,
    /// How the field is compared.
    pub operator: Operator,
    /// Value the field is compared with.
    pub value: Value,
}

impl Predicate {
    /// Whether `document` satisfies the clause. A missing field never does.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        let Some(field) = document.get(&self.path) else {
            return false;
        };
        match self.operator {
            Operator::Eq => values_equal(field, &self.value),
            Operator::Gte => matches!(
                compare_same_kind(field, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

/// Sort direction of an [`OrderBy`] key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field to sort on.
    pub path: FieldPath,
    /// Sort direction.
    pub direction: Direction,
}

impl OrderBy {
    /// Ascending key on `path`.
    #[must_use]
    pub fn asc(path: impl Into<FieldPath>) -> Self {
        Self {
            path: path.into(),
            direction: Direction::Asc,
        }
    }

    /// Descending key on `path`.
    #[must_use]
    pub fn desc(path: impl Into<FieldPath>) -> Self {
        Self {
            path: path.into(),
            direction: Direction::Desc,
        }
    }
}

/// Conjunction of predicates plus an ordering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    predicates: Vec<Predicate>,
    order: Vec<OrderBy>,
}

impl Query {
    /// A query that matches every document, in id order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause; all clauses must hold.
    #[must_use]
    pub fn filter(
        mut self,
        path: impl Into<FieldPath>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.predicates.push(Predicate {
            path: path.into(),
            operator,
            value: value.into(),
        });
        self
    }

    /// Appends a sort key. Earlier keys take precedence.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    /// The filter clauses, in the order they were added.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The sort keys, most significant first.
    #[must_use]
    pub fn ordering(&self) -> &[OrderBy] {
        &self.order
    }

    /// Whether `document` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        self.predicates.iter().all(|p| p.matches(document))
    }

    /// Compares two documents by the sort keys.
    #[must_use]
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        self.order
            .iter()
            .map(|key| {
                let ordering = compare_fields(a.get(&key.path), b.get(&key.path));
                match key.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Ordering::Equal,
        _ => a == b,
    }
}

fn compare_same_kind(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Some(compare_numbers(x, y)),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare_numbers(x: &serde_json::Number, y: &serde_json::Number) -> Ordering {
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
        return x.cmp(&y);
    }
    let x = x.as_f64().unwrap_or(f64::NAN);
    let y = y.as_f64().unwrap_or(f64::NAN);
    x.total_cmp(&y)
}

fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order used for sorting: missing and null first, then by kind,
/// then by value within a kind.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => compare_same_kind(x, y)
            .unwrap_or_else(|| kind_rank(a).cmp(&kind_rank(b))),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}
