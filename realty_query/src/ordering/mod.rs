//! # Ordering
//!
//! Sort terms applied in the order given, with optional locale collation for strings.

use std::{
    cmp,
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
};

use itertools::Itertools;
use realty_common::locale::{self, TURKISH_LOCALE};
use serde_json::{Map, Value as JsonValue, json};

use crate::store::document::{Document, resolve_path};

use self::error::{OrderingError, OrderingResult};

pub mod error;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ordering {
    pub terms: Vec<OrderingTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingTerm {
    pub name: String,
    pub direction: OrderingDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingDirection {
    Ascending,
    Descending,
}

/// String comparison rules used when sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collation {
    pub locale: String,
    pub case_level: bool,
}

impl Ordering {
    pub fn new(terms: Vec<OrderingTerm>) -> Self {
        Ordering { terms }
    }

    /// Parses sort entries in the order given.
    ///
    /// ```
    /// use realty_query::ordering::{Ordering, OrderingDirection};
    /// use serde_json::json;
    ///
    /// let ordering = Ordering::parse([
    ///     ("price.amount", &json!("desc")),
    ///     ("createdAt", &json!(1)),
    /// ])
    /// .unwrap();
    /// assert_eq!(ordering.to_string(), "price.amount desc, createdAt asc");
    /// assert_eq!(ordering.terms[0].direction, OrderingDirection::Descending);
    /// ```
    pub fn parse<'a, I>(entries: I) -> OrderingResult<Ordering>
    where
        I: IntoIterator<Item = (&'a str, &'a JsonValue)>,
    {
        let mut terms = Vec::new();
        let mut term_names = BTreeSet::new();
        for (name, direction) in entries {
            let direction = OrderingDirection::parse(direction)?;
            if !term_names.insert(name) {
                return Err(OrderingError::DuplicateField(name.into()));
            }
            terms.push(OrderingTerm {
                name: name.into(),
                direction,
            });
        }
        Ok(Ordering { terms })
    }

    /// Appends a term after the existing ones.
    pub fn push<S>(&mut self, name: S, direction: OrderingDirection) -> OrderingResult<()>
    where
        S: Into<String>,
    {
        let name = name.into();
        if self.terms.iter().any(|term| term.name == name) {
            return Err(OrderingError::DuplicateField(name));
        }
        self.terms.push(OrderingTerm { name, direction });
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn evaluate(
        &self,
        lhs: &Document,
        rhs: &Document,
        collation: Option<&Collation>,
    ) -> cmp::Ordering {
        for term in &self.terms {
            let a = resolve_path(lhs, &term.name).into_iter().next();
            let b = resolve_path(rhs, &term.name).into_iter().next();
            match compare_values(a, b, collation) {
                cmp::Ordering::Equal => {}
                ordering => {
                    return match term.direction {
                        OrderingDirection::Ascending => ordering,
                        OrderingDirection::Descending => ordering.reverse(),
                    };
                }
            }
        }
        cmp::Ordering::Equal
    }

    /// Renders a MongoDB sort document, `1` for ascending and `-1` for descending.
    pub fn to_document(&self) -> JsonValue {
        JsonValue::Object(
            self.terms
                .iter()
                .map(|term| (term.name.clone(), json!(term.direction.as_number())))
                .collect::<Map<_, _>>(),
        )
    }
}

impl OrderingDirection {
    /// Parses `asc`, `desc`, `1` or `-1`, given either as a string or a number.
    pub fn parse(value: &JsonValue) -> OrderingResult<Self> {
        match value {
            JsonValue::String(direction) => match direction.trim() {
                "asc" | "1" => Ok(Self::Ascending),
                "desc" | "-1" => Ok(Self::Descending),
                _ => Err(OrderingError::InvalidDirection(direction.clone())),
            },
            JsonValue::Number(direction) => match direction.as_i64() {
                Some(1) => Ok(Self::Ascending),
                Some(-1) => Ok(Self::Descending),
                _ => Err(OrderingError::InvalidDirection(direction.to_string())),
            },
            value => Err(OrderingError::InvalidDirection(value.to_string())),
        }
    }

    pub const fn as_number(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

impl Collation {
    /// Turkish collation with case level enabled.
    pub fn turkish() -> Self {
        Self {
            locale: TURKISH_LOCALE.into(),
            case_level: true,
        }
    }

    /// Compares strings under this collation.
    /// Locales other than Turkish fall back to code point order.
    pub fn compare(&self, lhs: &str, rhs: &str) -> cmp::Ordering {
        if self.locale != TURKISH_LOCALE {
            return lhs.cmp(rhs);
        }
        if self.case_level {
            locale::collate(lhs, rhs)
        } else {
            locale::collate(&locale::to_lower(lhs), &locale::to_lower(rhs))
        }
    }

    pub fn to_document(&self) -> JsonValue {
        json!({
            "locale": self.locale,
            "caseLevel": self.case_level,
        })
    }
}

/// Cross-type order: missing and null, numbers, strings, objects, arrays, booleans.
fn compare_values(
    lhs: Option<&JsonValue>,
    rhs: Option<&JsonValue>,
    collation: Option<&Collation>,
) -> cmp::Ordering {
    const fn rank(value: Option<&JsonValue>) -> u8 {
        match value {
            None | Some(JsonValue::Null) => 0,
            Some(JsonValue::Number(_)) => 1,
            Some(JsonValue::String(_)) => 2,
            Some(JsonValue::Object(_)) => 3,
            Some(JsonValue::Array(_)) => 4,
            Some(JsonValue::Bool(_)) => 5,
        }
    }

    match (lhs, rhs) {
        (Some(JsonValue::Number(a)), Some(JsonValue::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(cmp::Ordering::Equal),
        (Some(JsonValue::String(a)), Some(JsonValue::String(b))) => match collation {
            Some(collation) => collation.compare(a, b),
            None => a.cmp(b),
        },
        (Some(JsonValue::Bool(a)), Some(JsonValue::Bool(b))) => a.cmp(b),
        _ => rank(lhs).cmp(&rank(rhs)),
    }
}

impl Display for Ordering {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.terms.iter().map(ToString::to_string).join(", "))
    }
}

impl Display for OrderingTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.direction)
    }
}

impl Display for OrderingDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OrderingDirection::Ascending => f.write_str("asc"),
            OrderingDirection::Descending => f.write_str("desc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ordering::OrderingDirection::{Ascending, Descending};

    use super::*;

    fn document(value: JsonValue) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn parse() {
        let sort = [
            ("title.tr", json!("asc")),
            ("roomCount", json!(-1)),
            ("createdAt", json!("1")),
        ];
        let ordering = Ordering::parse(sort.iter().map(|(name, direction)| (*name, direction))).unwrap();
        assert_eq!(
            ordering,
            Ordering::new(vec![
                OrderingTerm {
                    name: "title.tr".into(),
                    direction: Ascending,
                },
                OrderingTerm {
                    name: "roomCount".into(),
                    direction: Descending,
                },
                OrderingTerm {
                    name: "createdAt".into(),
                    direction: Ascending,
                },
            ])
        );
        assert_eq!(
            ordering.to_document().to_string(),
            r#"{"title.tr":1,"roomCount":-1,"createdAt":1}"#
        );

        assert_eq!(
            Ordering::parse([("title", &json!("up"))]),
            Err(OrderingError::InvalidDirection("up".into()))
        );
        assert_eq!(
            Ordering::parse([("title", &json!(2))]),
            Err(OrderingError::InvalidDirection("2".into()))
        );
        assert_eq!(
            Ordering::parse([("title", &json!(1)), ("title", &json!(-1))]),
            Err(OrderingError::DuplicateField("title".into()))
        );
    }

    #[test]
    fn augment() {
        let mut ordering = Ordering::parse([("order", &json!("asc"))]).unwrap();
        ordering.push("createdAt", Ascending).unwrap();
        assert_eq!(ordering.to_string(), "order asc, createdAt asc");
        assert_eq!(
            ordering.push("order", Descending),
            Err(OrderingError::DuplicateField("order".into()))
        );
    }

    #[test]
    fn evaluate() {
        let a = document(json!({"city": "Çanakkale", "roomCount": 3}));
        let b = document(json!({"city": "Denizli", "roomCount": 3}));
        let missing = document(json!({"roomCount": 1}));

        let by_city = Ordering::parse([("city", &json!("asc"))]).unwrap();
        assert_eq!(by_city.evaluate(&a, &b, Some(&Collation::turkish())), cmp::Ordering::Less);
        assert_eq!(by_city.evaluate(&a, &b, None), cmp::Ordering::Greater);
        assert_eq!(by_city.evaluate(&missing, &a, None), cmp::Ordering::Less);

        let by_rooms_then_city = Ordering::parse([("roomCount", &json!(-1)), ("city", &json!(-1))]).unwrap();
        assert_eq!(
            by_rooms_then_city.evaluate(&a, &b, Some(&Collation::turkish())),
            cmp::Ordering::Greater
        );
        assert_eq!(by_rooms_then_city.evaluate(&missing, &a, None), cmp::Ordering::Greater);
    }

    #[test]
    fn collation() {
        let collation = Collation::turkish();
        assert_eq!(collation.compare("ılık", "ilik"), cmp::Ordering::Less);
        assert_eq!(collation.compare("ankara", "Ankara"), cmp::Ordering::Less);
        assert_eq!(
            collation.to_document(),
            json!({"locale": "tr", "caseLevel": true})
        );
    }
}
