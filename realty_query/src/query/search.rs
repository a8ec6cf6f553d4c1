//! # Search query.
//!
//! Turns a free-text search term into a filter over searchable fields.
//!
//! Terms are used as regex patterns as given. Turkish text is matched with
//! Turkish case rules: a term containing `i` or `İ` is expanded into its
//! as-is, upper, lower and title case forms, since case-insensitive regex
//! matching does not map `i` to `İ`.

use realty_common::{id, locale};
use tracing::debug;

use crate::{filter::Filter, value::Value};

/// Fields a search term is matched against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFields {
    pub text: Vec<String>,
    pub numeric: Vec<String>,
}

/// Search behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Match the term verbatim instead of case-insensitively.
    pub skip_case_sensitive_regex: bool,
    /// With `skip_case_sensitive_regex`, match by equality instead of regex.
    pub skip_regex: bool,
    /// Use the collection's full-text index.
    pub search_with_text_index: bool,
    /// With `search_with_text_index`, also match a term shaped like a document
    /// id against `_id`.
    pub add_id_to_search_text: bool,
}

impl SearchFields {
    pub fn text<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: fields.into_iter().map(Into::into).collect(),
            numeric: Vec::new(),
        }
    }

    pub fn with_numeric<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.numeric.is_empty()
    }
}

/// Builds the search predicate for `term`, or `None` if the term is blank or
/// there is nothing to search in.
///
/// ```
/// use realty_query::query::search::{SearchFields, SearchOptions, build_search_filter};
///
/// let fields = SearchFields::text(["title.en"]).with_numeric(["roomCount"]);
/// let filter = build_search_filter("5", &fields, SearchOptions::default()).unwrap();
/// assert_eq!(filter.to_string(), "roomCount = 5");
///
/// let filter = build_search_filter(" sea ", &fields, SearchOptions::default()).unwrap();
/// assert_eq!(filter.to_string(), "title.en ~ /sea/i");
/// ```
pub fn build_search_filter(
    term: &str,
    fields: &SearchFields,
    options: SearchOptions,
) -> Option<Filter> {
    let term = term.trim();
    if term.is_empty() || (fields.is_empty() && !options.search_with_text_index) {
        return None;
    }

    let filter = if let Some(number) = Value::parse_number(term).filter(|_| !fields.numeric.is_empty()) {
        Filter::any(
            fields
                .numeric
                .iter()
                .map(|field| Filter::equal(field.as_str(), number.clone())),
        )
    } else if options.search_with_text_index {
        let phrase = Filter::text(locale::to_lower(term));
        if options.add_id_to_search_text && id::is_document_id(term) {
            Filter::any([phrase, Filter::equal("_id", term)])
        } else {
            phrase
        }
    } else if fields.text.is_empty() {
        return None;
    } else if options.skip_case_sensitive_regex {
        Filter::any(fields.text.iter().map(|field| {
            if options.skip_regex {
                Filter::equal(field.as_str(), term)
            } else {
                Filter::regex(field.as_str(), term)
            }
        }))
    } else if locale::has_dotted_i(term) {
        let variants = [
            term.to_string(),
            locale::to_upper(term),
            locale::to_lower(term),
            locale::to_title(term),
        ];
        Filter::any(variants.iter().flat_map(|variant| {
            fields
                .text
                .iter()
                .map(move |field| Filter::regex_case_insensitive(field.as_str(), variant.as_str()))
        }))
    } else {
        Filter::any(
            fields
                .text
                .iter()
                .map(|field| Filter::regex_case_insensitive(field.as_str(), term)),
        )
    };

    debug!(%term, %filter, "built search filter");
    Some(filter)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::store::document::Document;

    use super::*;

    fn document(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn fields() -> SearchFields {
        SearchFields::text(["title.en", "city.tr"]).with_numeric(["roomCount"])
    }

    #[test]
    fn numeric_terms() {
        let filter = build_search_filter("5", &fields(), SearchOptions::default()).unwrap();
        assert_eq!(filter, Filter::equal("roomCount", 5));

        let five_rooms = document(json!({"roomCount": 5, "title": {"en": "Flat 15"}}));
        let fifteen = document(json!({"roomCount": 15, "title": {"en": "Flat 5"}}));
        assert!(filter.evaluate(&five_rooms).unwrap());
        assert!(!filter.evaluate(&fifteen).unwrap());

        let text_only = SearchFields::text(["title.en"]);
        assert_eq!(
            build_search_filter("5", &text_only, SearchOptions::default()),
            Some(Filter::regex_case_insensitive("title.en", "5"))
        );
    }

    #[test]
    fn turkish_variants() {
        let filter = build_search_filter("izmir", &fields(), SearchOptions::default()).unwrap();
        let Filter::Disjunction(parts) = &filter else {
            panic!("expected disjunction, got {filter}");
        };
        assert_eq!(parts.len(), 8);
        assert!(parts.contains(&Filter::regex_case_insensitive("city.tr", "İZMİR")));
        assert!(parts.contains(&Filter::regex_case_insensitive("city.tr", "İzmir")));

        let izmir = document(json!({"city": {"tr": "İzmir"}}));
        assert!(filter.evaluate(&izmir).unwrap());

        let filter = build_search_filter("ankara", &fields(), SearchOptions::default()).unwrap();
        assert_eq!(
            filter,
            Filter::any([
                Filter::regex_case_insensitive("title.en", "ankara"),
                Filter::regex_case_insensitive("city.tr", "ankara"),
            ])
        );
    }

    #[test]
    fn text_index() {
        let options = SearchOptions {
            search_with_text_index: true,
            ..Default::default()
        };
        assert_eq!(
            build_search_filter(" Deniz MANZARA ", &SearchFields::default(), options),
            Some(Filter::text("deniz manzara"))
        );

        let options = SearchOptions {
            add_id_to_search_text: true,
            ..options
        };
        assert_eq!(
            build_search_filter("681c7584b512c1249196b08f", &SearchFields::default(), options),
            Some(Filter::any([
                Filter::text("681c7584b512c1249196b08f"),
                Filter::equal("_id", "681c7584b512c1249196b08f"),
            ]))
        );
        assert_eq!(
            build_search_filter("abc", &SearchFields::default(), options),
            Some(Filter::text("abc"))
        );
    }

    #[test]
    fn case_sensitive() {
        let options = SearchOptions {
            skip_case_sensitive_regex: true,
            ..Default::default()
        };
        let fields = SearchFields::text(["email"]);
        assert_eq!(
            build_search_filter(" Ayse ", &fields, options),
            Some(Filter::regex("email", "Ayse"))
        );

        let options = SearchOptions {
            skip_regex: true,
            ..options
        };
        assert_eq!(
            build_search_filter("ayse@example.com", &fields, options),
            Some(Filter::equal("email", "ayse@example.com"))
        );
    }

    #[test]
    fn blank() {
        assert_eq!(build_search_filter("", &fields(), SearchOptions::default()), None);
        assert_eq!(build_search_filter("   ", &fields(), SearchOptions::default()), None);
        assert_eq!(
            build_search_filter("sea", &SearchFields::default(), SearchOptions::default()),
            None
        );
    }
}
