//! Dotted-path access into JSON documents.
//!
//! Paths address nested objects with `.` separators (`title.en`, `dues.amount`).
//! Resolution walks through arrays the way document stores do: `price.amount`
//! on a document whose `price` is an array of objects yields every element's
//! `amount`.

use serde_json::{Map, Value as JsonValue};

/// Stored document.
pub type Document = Map<String, JsonValue>;

/// Resolves every value addressed by `path`, descending into arrays.
pub fn resolve_path<'a>(document: &'a Document, path: &str) -> Vec<&'a JsonValue> {
    let mut segments = path.split('.');
    let mut values: Vec<&JsonValue> = match segments.next() {
        Some(first) => document.get(first).into_iter().collect(),
        None => return Vec::new(),
    };
    for segment in segments {
        let mut next = Vec::new();
        for value in values {
            match value {
                JsonValue::Object(map) => next.extend(map.get(segment)),
                JsonValue::Array(items) => {
                    if let Ok(index) = segment.parse::<usize>() {
                        next.extend(items.get(index));
                    }
                    next.extend(items.iter().filter_map(|item| item.as_object()?.get(segment)));
                }
                _ => {}
            }
        }
        values = next;
    }
    values
}

/// Gets the value at `path` through nested objects only.
pub fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a JsonValue> {
    let (parent, name) = match path.rsplit_once('.') {
        Some((parent, name)) => (get_path(document, parent)?.as_object()?, name),
        None => (document, path),
    };
    parent.get(name)
}

/// Sets the value at `path`, creating intermediate objects.
/// Non-object values in the way are replaced.
pub fn set_path(document: &mut Document, path: &str, value: JsonValue) {
    match path.split_once('.') {
        Some((head, rest)) => {
            let child = document
                .entry(head)
                .or_insert_with(|| JsonValue::Object(Document::new()));
            if !child.is_object() {
                *child = JsonValue::Object(Document::new());
            }
            if let JsonValue::Object(child) = child {
                set_path(child, rest, value);
            }
        }
        None => {
            document.insert(path.into(), value);
        }
    }
}

/// Removes the value at `path`, if any.
pub fn remove_path(document: &mut Document, path: &str) -> Option<JsonValue> {
    match path.split_once('.') {
        Some((head, rest)) => remove_path(document.get_mut(head)?.as_object_mut()?, rest),
        None => document.remove(path),
    }
}

/// Renders a reference value as a lookup key.
/// Extended JSON object ids (`{"$oid": "..."}`) render as their hex string.
pub fn id_key(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(id) => Some(id.clone()),
        JsonValue::Number(id) => Some(id.to_string()),
        JsonValue::Object(map) => map.get("$oid")?.as_str().map(Into::into),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document(value: JsonValue) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn resolve() {
        let hotel = document(json!({
            "title": {"tr": "Deniz Manzaralı", "en": "Sea View"},
            "price": [
                {"currency": "USD", "amount": 1000},
                {"currency": "EUR", "amount": 900},
            ],
        }));
        assert_eq!(resolve_path(&hotel, "title.en"), vec![&json!("Sea View")]);
        assert_eq!(resolve_path(&hotel, "price.amount"), vec![&json!(1000), &json!(900)]);
        assert_eq!(resolve_path(&hotel, "price.1.currency"), vec![&json!("EUR")]);
        assert!(resolve_path(&hotel, "title.de").is_empty());
        assert!(resolve_path(&hotel, "missing.field").is_empty());
    }

    #[test]
    fn get_set_remove() {
        let mut user = document(json!({"name": {"first": "Ayşe"}}));
        assert_eq!(get_path(&user, "name.first"), Some(&json!("Ayşe")));
        set_path(&mut user, "name.last", json!("Yılmaz"));
        set_path(&mut user, "address.city", json!("İzmir"));
        assert_eq!(
            user,
            document(json!({
                "name": {"first": "Ayşe", "last": "Yılmaz"},
                "address": {"city": "İzmir"},
            }))
        );
        assert_eq!(remove_path(&mut user, "name.first"), Some(json!("Ayşe")));
        assert_eq!(remove_path(&mut user, "name.first"), None);
        assert_eq!(get_path(&user, "name"), Some(&json!({"last": "Yılmaz"})));
    }

    #[test]
    fn id_keys() {
        assert_eq!(id_key(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(id_key(&json!({"$oid": "681c7584b512c1249196b08f"})).as_deref(), Some("681c7584b512c1249196b08f"));
        assert_eq!(id_key(&json!(null)), None);
    }
}
