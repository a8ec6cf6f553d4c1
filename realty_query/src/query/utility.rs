//! Lenient deserializers for query-string shaped input.
//!
//! Query parameters usually arrive as strings, so numbers and booleans are
//! accepted either in their JSON form or as text (`"2"`, `"true"`). Empty
//! strings are treated as missing.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientList {
    Values(Vec<String>),
    Text(String),
}

/// Deserializes an optional value given as itself or as its string form.
///
/// ```
/// use realty_query::query::utility::deserialize_lenient;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Params {
///     #[serde(default, deserialize_with = "deserialize_lenient")]
///     page: Option<i64>,
///     #[serde(default, deserialize_with = "deserialize_lenient")]
///     furnished: Option<bool>,
/// }
///
/// let params: Params = serde_json::from_str(r#"{"page": "2", "furnished": true}"#).unwrap();
/// assert_eq!(params.page, Some(2));
/// assert_eq!(params.furnished, Some(true));
/// ```
pub fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<Lenient<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Lenient::Value(value)) => Ok(Some(value)),
        Some(Lenient::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some).map_err(D::Error::custom)
            }
        }
    }
}

/// Deserializes an optional list given as an array or a comma separated string.
pub fn deserialize_lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match Option::<LenientList>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(LenientList::Values(values)) => values,
        Some(LenientList::Text(text)) => text.split(',').map(Into::into).collect(),
    };
    let values: Vec<String> = values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();
    Ok((!values.is_empty()).then_some(values))
}
