use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type Predicate<T> = dyn Fn(&T, &T) -> bool + Send + Sync;

/// Decides whether two records denote the same logical entity.
///
/// Built either from a key field name (loose equality on that field) or from an
/// arbitrary predicate. The comparator is shared by every cache mutation of a
/// manager, so it must stay consistent for the manager's lifetime.
pub struct IdentityComparator<T> {
    predicate: Arc<Predicate<T>>,
    field: Option<Arc<str>>,
}

impl<T> Clone for IdentityComparator<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            field: self.field.clone(),
        }
    }
}

impl<T> fmt::Debug for IdentityComparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "IdentityComparator(field = {field:?})"),
            None => f.write_str("IdentityComparator(<predicate>)"),
        }
    }
}

impl<T> IdentityComparator<T> {
    /// Wraps a custom identity predicate.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            field: None,
        }
    }

    /// Returns true when `a` and `b` are the same logical record.
    pub fn equal(&self, a: &T, b: &T) -> bool {
        (self.predicate)(a, b)
    }

    /// Name of the key field, if the comparator was built from one.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl<T: Serialize + 'static> IdentityComparator<T> {
    /// Compares the named field of both records with loose equality.
    ///
    /// A missing field reads as `null`. Records that fail to serialize never match.
    pub fn by_field(name: impl Into<String>) -> Self {
        let name: Arc<str> = Arc::from(name.into());
        let key = name.clone();
        Self {
            predicate: Arc::new(move |a: &T, b: &T| {
                match (project_field(a, &key), project_field(b, &key)) {
                    (Some(left), Some(right)) => loose_eq(&left, &right),
                    _ => false,
                }
            }),
            field: Some(name),
        }
    }
}

impl<T: Serialize + 'static> From<&str> for IdentityComparator<T> {
    fn from(field: &str) -> Self {
        Self::by_field(field)
    }
}

impl<T: Serialize + 'static> From<String> for IdentityComparator<T> {
    fn from(field: String) -> Self {
        Self::by_field(field)
    }
}

fn project_field<T: Serialize + 'static>(record: &T, field: &str) -> Option<Value> {
    // Dynamic records skip the serialization round trip.
    if let Some(value) = (record as &dyn Any).downcast_ref::<Value>() {
        return Some(value.get(field).cloned().unwrap_or(Value::Null));
    }
    let value = serde_json::to_value(record).ok()?;
    Some(value.get(field).cloned().unwrap_or(Value::Null))
}

/// Loose equality between two JSON values.
///
/// Numbers compare numerically, integers exactly. A number equals a string holding
/// the same number, booleans compare as 0/1 against numbers and numeric strings.
/// Arrays and objects compare structurally.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => a == b,
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.loose_eq(y),
            _ => false,
        },
    }
}

/// Integers stay exact; only a float on either side forces `f64` comparison.
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(n) => n as f64,
            Numeric::Float(n) => n,
        }
    }

    fn loose_eq(self, other: Numeric) -> bool {
        match (self, other) {
            (Numeric::Int(x), Numeric::Int(y)) => x == y,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

fn as_number(value: &Value) -> Option<Numeric> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .map(Numeric::Int)
            .or_else(|| n.as_f64().map(Numeric::Float)),
        Value::Bool(flag) => Some(Numeric::Int(i128::from(*flag))),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(Numeric::Int(0))
            } else if let Ok(n) = trimmed.parse::<i128>() {
                Some(Numeric::Int(n))
            } else {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| !n.is_nan())
                    .map(Numeric::Float)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Task {
        id: u32,
        title: String,
    }

    #[test]
    fn test_by_field_on_dynamic_records() {
        let cmp = IdentityComparator::<Value>::by_field("id");
        assert!(cmp.equal(&json!({"id": 1, "a": 1}), &json!({"id": 1, "a": 2})));
        assert!(!cmp.equal(&json!({"id": 1}), &json!({"id": 2})));
        assert_eq!(cmp.field(), Some("id"));
    }

    #[test]
    fn test_by_field_is_loose() {
        let cmp: IdentityComparator<Value> = "id".into();
        assert!(cmp.equal(&json!({"id": 5}), &json!({"id": "5"})));
        assert!(cmp.equal(&json!({"id": 5.0}), &json!({"id": 5})));
        assert!(!cmp.equal(&json!({"id": 5}), &json!({"id": "five"})));
    }

    #[test]
    fn test_by_field_on_typed_records() {
        let cmp = IdentityComparator::<Task>::by_field("id");
        let a = Task { id: 3, title: "a".into() };
        let b = Task { id: 3, title: "b".into() };
        let c = Task { id: 4, title: "a".into() };
        assert!(cmp.equal(&a, &b));
        assert!(!cmp.equal(&a, &c));
    }

    #[test]
    fn test_custom_predicate() {
        let cmp = IdentityComparator::from_fn(|a: &(u32, u32), b: &(u32, u32)| a.0 == b.0);
        assert!(cmp.equal(&(1, 2), &(1, 9)));
        assert!(!cmp.equal(&(1, 2), &(2, 2)));
        assert!(cmp.field().is_none());
    }

    #[test]
    fn test_loose_eq_table() {
        assert!(loose_eq(&json!(null), &json!(null)));
        assert!(!loose_eq(&json!(null), &json!(0)));
        assert!(loose_eq(&json!(true), &json!(1)));
        assert!(loose_eq(&json!("1"), &json!(true)));
        assert!(loose_eq(&json!(""), &json!(0)));
        assert!(loose_eq(&json!([1, 2]), &json!([1, 2])));
        assert!(!loose_eq(&json!("a"), &json!("b")));
    }

    #[test]
    fn test_large_integer_ids_stay_distinct() {
        let a = json!(9_007_199_254_740_993_u64);
        let b = json!(9_007_199_254_740_992_u64);
        assert!(!loose_eq(&a, &b));
        assert!(loose_eq(&a, &json!(9_007_199_254_740_993_u64)));
        assert!(!loose_eq(&a, &json!("9007199254740992")));
        assert!(loose_eq(&a, &json!("9007199254740993")));
        assert!(loose_eq(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!loose_eq(&json!(-1), &json!(u64::MAX)));

        #[derive(Serialize)]
        struct Order {
            id: u64,
        }
        let cmp = IdentityComparator::<Order>::by_field("id");
        assert!(!cmp.equal(
            &Order { id: 9_007_199_254_740_993 },
            &Order { id: 9_007_199_254_740_992 }
        ));
    }

    #[test]
    fn test_reflexive_on_missing_field() {
        let cmp = IdentityComparator::<Value>::by_field("id");
        let draft = json!({"title": "draft"});
        assert!(cmp.equal(&draft, &draft));
    }
}
