//! # Filter
//!
//! Predicate trees over stored documents.
//!
//! A [`Filter`] is built by search predicates, list scopes and the hotel filter
//! pipeline, combined with [`Filter::all`] and [`Filter::any`], and then either
//! evaluated against documents in memory or rendered into a document store query.

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use realty_common::geo::GeoPoint;

use crate::value::Value;

pub mod error;
mod evaluate;
mod render;

pub use evaluate::CompiledFilter;
pub(crate) use evaluate::geo_point;

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Conjunction(Vec<Filter>),
    Disjunction(Vec<Filter>),
    Negate(Box<Filter>),
    Restriction(String, FilterComparator, Value),
    Range(String, ValueRange),
    Regex(String, RegexMatch),
    /// Array field contains every value.
    ContainsAll(String, Vec<Value>),
    /// Field equals any of the values.
    In(String, Vec<Value>),
    /// Some element of an array field matches the inner filter.
    ElementMatch(String, Box<Filter>),
    Near(String, Proximity),
    /// Full-text phrase search.
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterComparator {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
}

/// Inclusive bounds, either of which may be open.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueRange {
    pub min: Option<Value>,
    pub max: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegexMatch {
    pub pattern: String,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub center: GeoPoint,
    pub max_distance_meters: f64,
}

impl Filter {
    /// Combines filters into a conjunction.
    /// Empty filters are dropped and nested conjunctions are flattened.
    ///
    /// ```
    /// use realty_query::filter::Filter;
    ///
    /// let filter = Filter::all([
    ///     Filter::equal("slug", "deniz-manzarali"),
    ///     Filter::default(),
    ///     Filter::all([Filter::not_equal("isPublished", false)]),
    /// ]);
    /// assert_eq!(
    ///     filter.to_string(),
    ///     r#"slug = "deniz-manzarali" AND isPublished != false"#,
    /// );
    /// ```
    pub fn all<I>(filters: I) -> Self
    where
        I: IntoIterator<Item = Filter>,
    {
        let mut parts = Vec::new();
        for filter in filters {
            match filter {
                Self::Conjunction(inner) => parts.extend(inner),
                filter => parts.push(filter),
            }
        }
        parts.retain(|part| !part.is_empty());
        if parts.len() == 1 {
            parts.pop().unwrap_or_default()
        } else {
            Self::Conjunction(parts)
        }
    }

    /// Combines filters into a disjunction.
    /// Nested disjunctions are flattened.
    pub fn any<I>(filters: I) -> Self
    where
        I: IntoIterator<Item = Filter>,
    {
        let mut parts = Vec::new();
        for filter in filters {
            match filter {
                Self::Disjunction(inner) => parts.extend(inner),
                filter => parts.push(filter),
            }
        }
        if parts.len() == 1 {
            parts.pop().unwrap_or_default()
        } else {
            Self::Disjunction(parts)
        }
    }

    pub fn compare<S, V>(field: S, comparator: FilterComparator, value: V) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        Self::Restriction(field.into(), comparator, value.into())
    }

    pub fn equal<S, V>(field: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        Self::compare(field, FilterComparator::Equal, value)
    }

    pub fn not_equal<S, V>(field: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        Self::compare(field, FilterComparator::NotEqual, value)
    }

    /// Creates an inclusive range filter, or `None` if both bounds are open.
    pub fn range<S>(field: S, min: Option<Value>, max: Option<Value>) -> Option<Self>
    where
        S: Into<String>,
    {
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self::Range(field.into(), ValueRange { min, max }))
    }

    pub fn regex<S, P>(field: S, pattern: P) -> Self
    where
        S: Into<String>,
        P: Into<String>,
    {
        Self::Regex(
            field.into(),
            RegexMatch {
                pattern: pattern.into(),
                case_insensitive: false,
            },
        )
    }

    pub fn regex_case_insensitive<S, P>(field: S, pattern: P) -> Self
    where
        S: Into<String>,
        P: Into<String>,
    {
        Self::Regex(
            field.into(),
            RegexMatch {
                pattern: pattern.into(),
                case_insensitive: true,
            },
        )
    }

    pub fn contains_all<S, I, V>(field: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::ContainsAll(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn any_of<S, I, V>(field: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn element_match<S>(field: S, filter: Filter) -> Self
    where
        S: Into<String>,
    {
        Self::ElementMatch(field.into(), Box::new(filter))
    }

    pub fn near<S>(field: S, center: GeoPoint, max_distance_meters: f64) -> Self
    where
        S: Into<String>,
    {
        Self::Near(
            field.into(),
            Proximity {
                center,
                max_distance_meters,
            },
        )
    }

    pub fn text<S>(phrase: S) -> Self
    where
        S: Into<String>,
    {
        Self::Text(phrase.into())
    }

    pub fn add_conjunction(&mut self, other: Filter) {
        *self = Self::all([std::mem::take(self), other]);
    }

    pub fn add_disjunction(&mut self, other: Filter) {
        if self.is_empty() {
            *self = other;
        } else {
            *self = Self::any([std::mem::take(self), other]);
        }
    }

    /// Finds a proximity term at the top level or inside a top-level conjunction.
    /// Document stores order proximity matches by distance.
    pub fn proximity(&self) -> Option<(&str, &Proximity)> {
        match self {
            Self::Near(field, proximity) => Some((field.as_str(), proximity)),
            Self::Conjunction(parts) => parts.iter().find_map(Self::proximity),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Conjunction(parts) | Self::Disjunction(parts) => {
                parts.iter().map(Self::len).sum()
            }
            Self::Negate(inner) | Self::ElementMatch(_, inner) => inner.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::Conjunction(Vec::new())
    }
}

impl FilterComparator {
    /// Checks whether a stored value ordered `ordering` relative to the
    /// argument satisfies this comparator.
    pub const fn accepts(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            Self::Less => matches!(ordering, Less),
            Self::LessOrEqual => matches!(ordering, Less | Equal),
            Self::Greater => matches!(ordering, Greater),
            Self::GreaterOrEqual => matches!(ordering, Greater | Equal),
            Self::Equal => matches!(ordering, Equal),
            Self::NotEqual => !matches!(ordering, Equal),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fn grouped(filter: &Filter) -> String {
            match filter {
                Filter::Conjunction(parts) | Filter::Disjunction(parts) if parts.len() > 1 => {
                    format!("({filter})")
                }
                _ => filter.to_string(),
            }
        }

        match self {
            Self::Conjunction(parts) => f.write_str(&parts.iter().map(grouped).join(" AND ")),
            Self::Disjunction(parts) => f.write_str(&parts.iter().map(grouped).join(" OR ")),
            Self::Negate(inner) => write!(f, "NOT {}", grouped(inner)),
            Self::Restriction(field, comparator, value) => {
                write!(f, "{field} {comparator} {value}")
            }
            Self::Range(field, range) => write!(f, "{field} IN {range}"),
            Self::Regex(field, regex) => write!(f, "{field} ~ {regex}"),
            Self::ContainsAll(field, values) => {
                write!(f, "{field} ALL [{}]", values.iter().join(", "))
            }
            Self::In(field, values) => write!(f, "{field} IN [{}]", values.iter().join(", ")),
            Self::ElementMatch(field, inner) => write!(f, "{field} MATCH ({inner})"),
            Self::Near(field, proximity) => write!(
                f,
                "{field} NEAR {} WITHIN {}m",
                proximity.center, proximity.max_distance_meters
            ),
            Self::Text(phrase) => write!(f, "TEXT {phrase:?}"),
        }
    }
}

impl Display for FilterComparator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Less => f.write_str("<"),
            Self::LessOrEqual => f.write_str("<="),
            Self::Greater => f.write_str(">"),
            Self::GreaterOrEqual => f.write_str(">="),
            Self::Equal => f.write_str("="),
            Self::NotEqual => f.write_str("!="),
        }
    }
}

impl Display for ValueRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if let Some(min) = &self.min {
            min.fmt(f)?;
        }
        f.write_str("..")?;
        if let Some(max) = &self.max {
            max.fmt(f)?;
        }
        f.write_str("]")
    }
}

impl Display for RegexMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.pattern)?;
        if self.case_insensitive {
            f.write_str("i")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose() {
        let mut filter = Filter::default();
        assert!(filter.is_empty());

        filter.add_conjunction(Filter::equal("slug", "a"));
        assert_eq!(filter, Filter::equal("slug", "a"));

        filter.add_conjunction(Filter::equal("isFurnished", true));
        filter.add_conjunction(Filter::all([
            Filter::not_equal("isPublished", false),
            Filter::default(),
        ]));
        assert_eq!(filter.len(), 3);
        assert!(matches!(&filter, Filter::Conjunction(parts) if parts.len() == 3));

        let mut search = Filter::default();
        search.add_disjunction(Filter::regex("title.en", "sea"));
        search.add_disjunction(Filter::regex("title.tr", "deniz"));
        assert!(matches!(&search, Filter::Disjunction(parts) if parts.len() == 2));

        assert_eq!(Filter::range("roomCount", None, None), None);
        assert_eq!(Filter::all([]), Filter::default());
    }

    #[test]
    fn display() {
        let filter = Filter::all([
            Filter::any([
                Filter::regex_case_insensitive("title.en", "sea"),
                Filter::regex("title.tr", "deniz"),
            ]),
            Filter::range("roomCount", Some(2.into()), None).unwrap(),
            Filter::contains_all("featureIds", ["a", "b"]),
            Filter::element_match(
                "price",
                Filter::all([
                    Filter::equal("currency", "USD"),
                    Filter::compare("amount", FilterComparator::GreaterOrEqual, 1000),
                ]),
            ),
            Filter::near("location", GeoPoint::new(29.0, 41.0), 5000.0),
            Filter::Negate(Box::new(Filter::any_of("_id", ["x"]))),
            Filter::text("izmir"),
        ]);
        assert_eq!(
            filter.to_string(),
            concat!(
                r#"(title.en ~ /sea/i OR title.tr ~ /deniz/) AND roomCount IN [2..] AND "#,
                r#"featureIds ALL ["a", "b"] AND price MATCH (currency = "USD" AND amount >= 1000) AND "#,
                r#"location NEAR [29, 41] WITHIN 5000m AND NOT _id IN ["x"] AND TEXT "izmir""#,
            )
        );
    }

    #[test]
    fn proximity() {
        let filter = Filter::all([
            Filter::equal("isFurnished", true),
            Filter::near("location", GeoPoint::new(29.0, 41.0), 1000.0),
        ]);
        let (field, proximity) = filter.proximity().unwrap();
        assert_eq!(field, "location");
        assert!((proximity.max_distance_meters - 1000.0).abs() < f64::EPSILON);
        assert!(Filter::equal("a", 1).proximity().is_none());
    }
}
