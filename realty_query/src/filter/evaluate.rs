use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use serde_json::Value as JsonValue;

use realty_common::{geo::GeoPoint, locale};

use crate::{
    store::document::{Document, resolve_path},
    value::Value,
};

use super::{
    Filter, FilterComparator, RegexMatch, ValueRange,
    error::{FilterError, FilterResult},
};

/// A filter with every regex compiled, ready to match many documents.
#[derive(Debug)]
pub struct CompiledFilter<'a> {
    filter: &'a Filter,
    regexes: HashMap<&'a RegexMatch, Regex>,
}

impl Filter {
    /// Compiles every regex of the filter once.
    ///
    /// # Errors
    ///
    /// Returns an error if a regex pattern is invalid, whether or not any
    /// document has the field it applies to.
    pub fn compile(&self) -> FilterResult<CompiledFilter<'_>> {
        let mut regexes = HashMap::new();
        collect_regexes(self, &mut regexes)?;
        Ok(CompiledFilter {
            filter: self,
            regexes,
        })
    }

    /// Checks that the filter can be evaluated.
    ///
    /// # Errors
    ///
    /// Returns an error if a regex pattern is invalid.
    pub fn validate(&self) -> FilterResult<()> {
        self.compile().map(|_| ())
    }

    /// Evaluates the filter against a single stored document.
    ///
    /// Comparisons on array fields match if any element matches, and a field
    /// compared for equality with `null` matches when it is missing.
    pub fn evaluate(&self, document: &Document) -> FilterResult<bool> {
        Ok(self.compile()?.matches(document))
    }
}

impl CompiledFilter<'_> {
    pub fn matches(&self, document: &Document) -> bool {
        self.matches_filter(self.filter, document)
    }

    fn matches_filter(&self, filter: &Filter, document: &Document) -> bool {
        match filter {
            Filter::Conjunction(parts) => parts.iter().all(|part| self.matches_filter(part, document)),
            Filter::Disjunction(parts) => parts.iter().any(|part| self.matches_filter(part, document)),
            Filter::Negate(inner) => !self.matches_filter(inner, document),
            Filter::Restriction(field, comparator, value) => {
                let leaves = resolve_path(document, field);
                match comparator {
                    FilterComparator::Equal => equals(&leaves, value),
                    FilterComparator::NotEqual => !equals(&leaves, value),
                    comparator => candidates(&leaves).into_iter().any(|candidate| {
                        value
                            .compare_json(candidate)
                            .is_some_and(|ordering| comparator.accepts(ordering))
                    }),
                }
            }
            Filter::Range(field, range) => candidates(&resolve_path(document, field))
                .into_iter()
                .any(|candidate| range.contains(candidate)),
            Filter::Regex(field, regex) => {
                let Some(regex) = self.regexes.get(regex) else {
                    return false;
                };
                candidates(&resolve_path(document, field))
                    .into_iter()
                    .filter_map(JsonValue::as_str)
                    .any(|candidate| regex.is_match(candidate))
            }
            Filter::ContainsAll(field, values) => {
                let candidates = candidates(&resolve_path(document, field));
                !values.is_empty()
                    && values.iter().all(|value| {
                        candidates
                            .iter()
                            .any(|candidate| value.matches_json(candidate))
                    })
            }
            Filter::In(field, values) => {
                let leaves = resolve_path(document, field);
                values.iter().any(|value| equals(&leaves, value))
            }
            Filter::ElementMatch(field, inner) => resolve_path(document, field)
                .into_iter()
                .filter_map(JsonValue::as_array)
                .flatten()
                .filter_map(JsonValue::as_object)
                .any(|item| self.matches_filter(inner, item)),
            Filter::Near(field, proximity) => resolve_path(document, field)
                .into_iter()
                .filter_map(geo_point)
                .any(|point| {
                    proximity.center.distance_meters(&point) <= proximity.max_distance_meters
                }),
            Filter::Text(phrase) => {
                let phrase = locale::to_lower(phrase);
                contains_text(document.values(), &phrase)
            }
        }
    }
}

fn collect_regexes<'a>(
    filter: &'a Filter,
    regexes: &mut HashMap<&'a RegexMatch, Regex>,
) -> FilterResult<()> {
    match filter {
        Filter::Conjunction(parts) | Filter::Disjunction(parts) => {
            for part in parts {
                collect_regexes(part, regexes)?;
            }
        }
        Filter::Negate(inner) | Filter::ElementMatch(_, inner) => collect_regexes(inner, regexes)?,
        Filter::Regex(_, regex) if !regexes.contains_key(regex) => {
            regexes.insert(regex, regex.compile()?);
        }
        _ => {}
    }
    Ok(())
}

impl RegexMatch {
    pub fn compile(&self) -> FilterResult<Regex> {
        RegexBuilder::new(&self.pattern)
            .case_insensitive(self.case_insensitive)
            .build()
            .map_err(|err| FilterError::InvalidRegex {
                pattern: self.pattern.clone(),
                reason: err.to_string(),
            })
    }
}

impl ValueRange {
    pub fn contains(&self, value: &JsonValue) -> bool {
        use std::cmp::Ordering::{Greater, Less};

        let above_min = self.min.as_ref().is_none_or(|min| {
            min.compare_json(value)
                .is_some_and(|ordering| ordering != Less)
        });
        let below_max = self.max.as_ref().is_none_or(|max| {
            max.compare_json(value)
                .is_some_and(|ordering| ordering != Greater)
        });
        above_min && below_max
    }
}

/// Resolves a stored location, either a GeoJSON point or a `[longitude, latitude]` pair.
pub(crate) fn geo_point(value: &JsonValue) -> Option<GeoPoint> {
    let coordinates = match value {
        JsonValue::Object(map) => map.get("coordinates")?.as_array()?,
        JsonValue::Array(coordinates) => coordinates,
        _ => return None,
    };
    let coordinates: Vec<f64> = coordinates
        .iter()
        .map(JsonValue::as_f64)
        .collect::<Option<_>>()?;
    GeoPoint::from_coordinates(&coordinates)
}

fn candidates<'a>(leaves: &[&'a JsonValue]) -> Vec<&'a JsonValue> {
    let mut candidates = Vec::with_capacity(leaves.len());
    for &leaf in leaves {
        candidates.push(leaf);
        if let JsonValue::Array(items) = leaf {
            candidates.extend(items);
        }
    }
    candidates
}

fn equals(leaves: &[&JsonValue], value: &Value) -> bool {
    if matches!(value, Value::Null) && leaves.is_empty() {
        return true;
    }
    candidates(leaves)
        .into_iter()
        .any(|candidate| value.matches_json(candidate))
}

fn contains_text<'a, I>(values: I, phrase: &str) -> bool
where
    I: IntoIterator<Item = &'a JsonValue>,
{
    values.into_iter().any(|value| match value {
        JsonValue::String(text) => locale::to_lower(text).contains(phrase),
        JsonValue::Array(items) => contains_text(items, phrase),
        JsonValue::Object(map) => contains_text(map.values(), phrase),
        _ => false,
    })
}
