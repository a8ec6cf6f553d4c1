//! # List query.
//!
//! Normalizes raw list parameters (page, limit, search, sort, select and the
//! behavior flags) into a validated [`ListQuery`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::{
    ordering::{Ordering, error::OrderingResult},
    query::{
        error::{QueryError, QueryResult},
        pagination::PageWindow,
        projection::Projection,
        search::SearchOptions,
        utility::deserialize_lenient,
    },
};

/// List parameters as received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawListQuery {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub page: Option<i64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort: Option<SortSpec>,
    pub select: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub populate: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub skip_totals: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub skip_collation: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub skip_case_sensitive_regex: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub skip_regex: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub search_with_text_index: Option<bool>,
}

/// Represents a validated list query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    /// Trimmed search term, `None` if blank.
    pub search: Option<String>,
    /// Sort as requested, echoed back in results.
    pub sort: SortSpec,
    pub ordering: Ordering,
    pub select: Option<Projection>,
    pub populate: Option<bool>,
    pub flags: ListFlags,
}

/// Behavior switches for a list read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFlags {
    /// Skip counting; `totalItems` is reported as `-1`.
    pub skip_totals: bool,
    /// Sort strings by code point instead of Turkish collation.
    pub skip_collation: bool,
    pub skip_case_sensitive_regex: bool,
    pub skip_regex: bool,
    pub search_with_text_index: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

#[derive(Debug, Clone)]
pub struct ListQueryBuilder {
    options: ListQueryConfig,
}

/// Sort fields with their directions, in the order given.
///
/// Deserializes from an object (`{"price.amount": "desc", "createdAt": 1}`) or
/// from a string of space or comma separated fields where a leading `-` means
/// descending (`"-price.amount createdAt"`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortSpec(Vec<(String, JsonValue)>);

impl Default for ListQueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl ListQueryBuilder {
    pub fn new(options: ListQueryConfig) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ListQueryConfig {
        &self.options
    }

    pub fn build(&self, raw: &RawListQuery) -> QueryResult<ListQuery> {
        let limit = match raw.limit {
            None | Some(0) => self.options.default_page_size,
            Some(limit) if limit < 0 => return Err(QueryError::InvalidLimit(limit)),
            Some(limit) if limit > i64::from(self.options.max_page_size) => {
                return Err(QueryError::LimitTooHigh {
                    limit,
                    max: self.options.max_page_size,
                });
            }
            Some(limit) => u32::try_from(limit).unwrap_or(self.options.max_page_size),
        };

        let page = match raw.page {
            None | Some(0) => 1,
            Some(page) if page < 0 => return Err(QueryError::InvalidPage(page)),
            Some(page) => u32::try_from(page).unwrap_or(u32::MAX),
        };

        let sort = raw.sort.clone().unwrap_or_default();
        let ordering = sort.ordering()?;

        let select = match raw.select.as_deref() {
            Some(select) => Projection::parse(select)?,
            None => None,
        };

        let search = raw
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(Into::into);

        Ok(ListQuery {
            page,
            limit,
            search,
            sort,
            ordering,
            select,
            populate: raw.populate,
            flags: ListFlags {
                skip_totals: raw.skip_totals.unwrap_or_default(),
                skip_collation: raw.skip_collation.unwrap_or_default(),
                skip_case_sensitive_regex: raw.skip_case_sensitive_regex.unwrap_or_default(),
                skip_regex: raw.skip_regex.unwrap_or_default(),
                search_with_text_index: raw.search_with_text_index.unwrap_or_default(),
            },
        })
    }
}

impl ListQuery {
    pub fn window(&self) -> PageWindow {
        PageWindow::page(self.page, self.limit)
    }
}

impl ListFlags {
    /// A flag is set if it is set on either side.
    pub const fn union(self, other: Self) -> Self {
        Self {
            skip_totals: self.skip_totals || other.skip_totals,
            skip_collation: self.skip_collation || other.skip_collation,
            skip_case_sensitive_regex: self.skip_case_sensitive_regex
                || other.skip_case_sensitive_regex,
            skip_regex: self.skip_regex || other.skip_regex,
            search_with_text_index: self.search_with_text_index || other.search_with_text_index,
        }
    }

    pub const fn search_options(self, add_id_to_search_text: bool) -> SearchOptions {
        SearchOptions {
            skip_case_sensitive_regex: self.skip_case_sensitive_regex,
            skip_regex: self.skip_regex,
            search_with_text_index: self.search_with_text_index,
            add_id_to_search_text,
        }
    }
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sort field.
    pub fn with<S, D>(mut self, field: S, direction: D) -> Self
    where
        S: Into<String>,
        D: Into<JsonValue>,
    {
        self.0.push((field.into(), direction.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.0.iter().map(|(field, direction)| (field.as_str(), direction))
    }

    pub fn ordering(&self) -> OrderingResult<Ordering> {
        Ordering::parse(self.iter())
    }

    fn parse_text(source: &str) -> Self {
        let mut sort = Self::new();
        for token in source
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
        {
            sort = match token.strip_prefix('-') {
                Some(field) => sort.with(field, "desc"),
                None => sort.with(token.trim_start_matches('+'), "asc"),
            };
        }
        sort
    }
}

impl Serialize for SortSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawSort {
            Entries(Map<String, JsonValue>),
            Text(String),
        }

        Ok(match RawSort::deserialize(deserializer)? {
            RawSort::Entries(entries) => Self(entries.into_iter().collect()),
            RawSort::Text(text) => Self::parse_text(&text),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{ordering::OrderingDirection, query::projection::ProjectionMode};

    use super::*;

    fn raw(value: JsonValue) -> RawListQuery {
        serde_json::from_value(value).unwrap()
    }

    fn builder() -> ListQueryBuilder {
        ListQueryBuilder::new(ListQueryConfig::default())
    }

    #[test]
    fn it_works() {
        let query = builder()
            .build(&raw(json!({
                "page": "2",
                "limit": 25,
                "search": "  deniz ",
                "sort": {"price.amount": "desc", "createdAt": 1},
                "select": "title slug",
                "skipTotals": "true",
            })))
            .unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 25);
        assert_eq!(query.search.as_deref(), Some("deniz"));
        assert_eq!(query.ordering.to_string(), "price.amount desc, createdAt asc");
        assert_eq!(query.select.as_ref().map(|select| select.mode), Some(ProjectionMode::Include));
        assert!(query.flags.skip_totals);
        assert!(!query.flags.skip_collation);
        assert_eq!(query.window(), PageWindow::page(2, 25));
        assert_eq!(
            serde_json::to_string(&query.sort).unwrap(),
            r#"{"price.amount":"desc","createdAt":1}"#
        );
    }

    #[test]
    fn defaults() {
        let query = builder().build(&RawListQuery::default()).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.search, None);
        assert!(query.ordering.is_empty());
        assert_eq!(query.flags, ListFlags::default());

        let query = builder()
            .build(&raw(json!({"page": 0, "limit": 0, "search": "   "})))
            .unwrap();
        assert_eq!((query.page, query.limit, query.search), (1, 10, None));
    }

    #[test]
    fn errors() {
        let q = builder();
        assert_eq!(
            q.build(&raw(json!({"limit": 101}))),
            Err(QueryError::LimitTooHigh {
                limit: 101,
                max: 100
            })
        );
        assert!(q.build(&raw(json!({"limit": 100}))).is_ok());
        assert_eq!(
            q.build(&raw(json!({"limit": -5}))),
            Err(QueryError::InvalidLimit(-5))
        );
        assert_eq!(
            q.build(&raw(json!({"page": -1}))),
            Err(QueryError::InvalidPage(-1))
        );
        assert_eq!(
            q.build(&raw(json!({"sort": {"title": "up"}}))),
            Err(QueryError::InvalidSortDirection("up".into()))
        );
        assert_eq!(
            q.build(&raw(json!({"sort": "title,-title"}))),
            Err(QueryError::DuplicateSortField("title".into()))
        );
        assert!(matches!(
            q.build(&raw(json!({"select": "title -description"}))),
            Err(QueryError::InvalidProjection(_))
        ));

        let err = q.build(&raw(json!({"limit": 500}))).unwrap_err();
        assert_eq!(err.error_code(), "LIMIT_TOO_HIGH");
        assert_eq!(err.get_violating_field_name(), "limit");
        assert_eq!(err.to_string(), "Limit can't be higher than 100");
    }

    #[test]
    fn sort_text() {
        let sort: SortSpec = serde_json::from_value(json!("-price.amount, createdAt")).unwrap();
        let ordering = sort.ordering().unwrap();
        assert_eq!(ordering.terms[0].direction, OrderingDirection::Descending);
        assert_eq!(ordering.to_string(), "price.amount desc, createdAt asc");
    }

    #[test]
    fn flags() {
        let query = ListFlags {
            skip_totals: true,
            ..Default::default()
        };
        let service = ListFlags {
            skip_collation: true,
            ..Default::default()
        };
        let flags = query.union(service);
        assert!(flags.skip_totals && flags.skip_collation);
        assert!(!flags.search_with_text_index);
        assert!(flags.search_options(true).add_id_to_search_text);
    }
}
