use serde_json::{Map, Value as JsonValue, json};

use super::{Filter, FilterComparator, ValueRange};
use crate::value::Value;

impl Filter {
    /// Renders the filter as a MongoDB query document.
    ///
    /// Conjunction parts are merged into one document while their keys are
    /// distinct; parts whose keys collide go into an explicit `$and` list.
    ///
    /// ```
    /// use realty_query::filter::Filter;
    /// use serde_json::json;
    ///
    /// let filter = Filter::all([
    ///     Filter::equal("slug", "deniz"),
    ///     Filter::not_equal("isPublished", false),
    /// ]);
    /// assert_eq!(
    ///     filter.to_document(),
    ///     json!({"slug": "deniz", "isPublished": {"$ne": false}}),
    /// );
    /// ```
    pub fn to_document(&self) -> JsonValue {
        JsonValue::Object(self.to_map())
    }

    fn to_map(&self) -> Map<String, JsonValue> {
        match self {
            Self::Conjunction(parts) => conjunction_map(parts),
            Self::Disjunction(parts) => single(
                "$or",
                JsonValue::Array(parts.iter().map(Self::to_document).collect()),
            ),
            Self::Negate(inner) => single("$nor", json!([inner.to_document()])),
            Self::Restriction(field, FilterComparator::Equal, value) => {
                single(field, value.to_json())
            }
            Self::Restriction(field, comparator, value) => {
                let operator = match comparator {
                    FilterComparator::Less => "$lt",
                    FilterComparator::LessOrEqual => "$lte",
                    FilterComparator::Greater => "$gt",
                    FilterComparator::GreaterOrEqual => "$gte",
                    FilterComparator::Equal => "$eq",
                    FilterComparator::NotEqual => "$ne",
                };
                single(field, JsonValue::Object(single(operator, value.to_json())))
            }
            Self::Range(field, range) => single(field, range_document(range)),
            Self::Regex(field, regex) => {
                let mut operators = Map::new();
                operators.insert("$regex".into(), regex.pattern.clone().into());
                if regex.case_insensitive {
                    operators.insert("$options".into(), "i".into());
                }
                single(field, JsonValue::Object(operators))
            }
            Self::ContainsAll(field, values) => single(field, json!({ "$all": array(values) })),
            Self::In(field, values) => single(field, json!({ "$in": array(values) })),
            Self::ElementMatch(field, inner) => {
                single(field, json!({ "$elemMatch": inner.to_document() }))
            }
            Self::Near(field, proximity) => single(
                field,
                json!({
                    "$near": {
                        "$geometry": {
                            "type": "Point",
                            "coordinates": proximity.center.coordinates(),
                        },
                        "$maxDistance": proximity.max_distance_meters,
                    }
                }),
            ),
            Self::Text(phrase) => single("$text", json!({ "$search": format!("\"{phrase}\"") })),
        }
    }
}

fn conjunction_map(parts: &[Filter]) -> Map<String, JsonValue> {
    let mut merged = Map::new();
    let mut and = Vec::new();
    for part in parts {
        let map = part.to_map();
        if map.keys().any(|key| merged.contains_key(key)) {
            and.push(JsonValue::Object(map));
        } else {
            merged.extend(map);
        }
    }
    if !and.is_empty() {
        match merged.get_mut("$and") {
            Some(JsonValue::Array(existing)) => existing.extend(and),
            _ => {
                merged.insert("$and".into(), JsonValue::Array(and));
            }
        }
    }
    merged
}

fn range_document(range: &ValueRange) -> JsonValue {
    let mut operators = Map::new();
    if let Some(min) = &range.min {
        operators.insert("$gte".into(), min.to_json());
    }
    if let Some(max) = &range.max {
        operators.insert("$lte".into(), max.to_json());
    }
    JsonValue::Object(operators)
}

fn array(values: &[Value]) -> JsonValue {
    JsonValue::Array(values.iter().map(Value::to_json).collect())
}

fn single(key: &str, value: JsonValue) -> Map<String, JsonValue> {
    let mut map = Map::new();
    map.insert(key.into(), value);
    map
}

#[cfg(test)]
mod tests {
    use realty_common::geo::GeoPoint;

    use super::*;

    #[test]
    fn search_and_scope() {
        let filter = Filter::all([
            Filter::any([
                Filter::equal("isPublished", false),
                Filter::equal("isConfirmed", false),
            ]),
            Filter::any([
                Filter::regex_case_insensitive("title.en", "sea"),
                Filter::regex_case_insensitive("title.tr", "sea"),
            ]),
        ]);
        assert_eq!(
            filter.to_document(),
            json!({
                "$or": [{"isPublished": false}, {"isConfirmed": false}],
                "$and": [{
                    "$or": [
                        {"title.en": {"$regex": "sea", "$options": "i"}},
                        {"title.tr": {"$regex": "sea", "$options": "i"}},
                    ]
                }],
            })
        );
    }

    #[test]
    fn operators() {
        let filter = Filter::all([
            Filter::range("roomCount", Some(2.into()), Some(4.into())).unwrap(),
            Filter::range("buildYear", Some(2000.into()), None).unwrap(),
            Filter::contains_all("featureIds", ["A", "B"]),
            Filter::element_match(
                "price",
                Filter::all([
                    Filter::equal("currency", "USD"),
                    Filter::compare("amount", FilterComparator::GreaterOrEqual, 1000),
                ]),
            ),
            Filter::regex("slug", "^deniz"),
            Filter::Negate(Box::new(Filter::any_of("_id", ["x", "y"]))),
        ]);
        assert_eq!(
            filter.to_document(),
            json!({
                "roomCount": {"$gte": 2, "$lte": 4},
                "buildYear": {"$gte": 2000},
                "featureIds": {"$all": ["A", "B"]},
                "price": {"$elemMatch": {"currency": "USD", "amount": {"$gte": 1000}}},
                "slug": {"$regex": "^deniz"},
                "$nor": [{"_id": {"$in": ["x", "y"]}}],
            })
        );
    }

    #[test]
    fn geo_and_text() {
        assert_eq!(
            Filter::near("location", GeoPoint::new(29.0, 41.0), 5_000.0).to_document(),
            json!({
                "location": {
                    "$near": {
                        "$geometry": {"type": "Point", "coordinates": [29.0, 41.0]},
                        "$maxDistance": 5_000.0,
                    }
                }
            })
        );
        assert_eq!(
            Filter::text("deniz manzaralı").to_document(),
            json!({"$text": {"$search": "\"deniz manzaralı\""}})
        );
        assert_eq!(Filter::default().to_document(), json!({}));
    }
}
