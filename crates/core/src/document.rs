//! Documents and dotted field paths
//!
//! A document is a JSON object. Fields are addressed by dotted paths
//! (`address.city`); each segment names an object key. Array elements are
//! never addressed by index here: filters treat arrays as sets of values.

use serde_json::{Map, Value};

/// A stored document: a JSON object keyed by field name
pub type Document = Map<String, Value>;

/// Name of the identity field used by stores to upsert documents
pub const ID_FIELD: &str = "id";

/// Split a dotted path into its key segments
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

/// Get the value at a dotted path
///
/// Returns `None` if any segment is missing or traverses a non-object.
pub fn get_at_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut parts = segments(path);
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(obj) => obj.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Set the value at a dotted path, creating intermediate objects
///
/// An intermediate value that is not an object is replaced by an empty
/// object, matching document-store `$set` behaviour on scalar parents.
pub fn set_at_path(doc: &mut Document, path: &str, value: Value) {
    let parts: Vec<&str> = segments(path).collect();
    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    let mut current = doc;
    for part in parents {
        let slot = current
            .entry((*part).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(obj) = slot else {
            return;
        };
        current = obj;
    }
    current.insert((*last).to_string(), value);
}

/// Get a mutable reference to the value at a dotted path
pub fn get_at_path_mut<'a>(doc: &'a mut Document, path: &str) -> Option<&'a mut Value> {
    let mut parts = segments(path);
    let mut current = doc.get_mut(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(obj) => obj.get_mut(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Remove the value at a dotted path, returning it if it existed
pub fn remove_at_path(doc: &mut Document, path: &str) -> Option<Value> {
    match path.rsplit_once('.') {
        None => doc.remove(path),
        Some((parent, last)) => match get_at_path_mut(doc, parent)? {
            Value::Object(obj) => obj.remove(last),
            _ => None,
        },
    }
}

/// Compare two values with numeric normalization
///
/// `1` and `1.0` are equal; everything else uses structural equality.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        _ => a == b,
    }
}

/// Convert a JSON value into a document, if it is an object
pub fn into_document(value: Value) -> Option<Document> {
    match value {
        Value::Object(obj) => Some(obj),
        _ => None,
    }
}
