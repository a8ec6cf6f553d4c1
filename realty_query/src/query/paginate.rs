//! # Paginate
//!
//! The generic list operation shared by every entity: search, count, sorted
//! and windowed read, population and the result envelope.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use crate::{
    error::RequestResult,
    filter::Filter,
    ordering::Collation,
    store::{Document, DocumentStoreArc, FindOptions},
};

use super::{
    list::{ListFlags, ListQuery},
    pagination::{PageWindow, Pagination, PaginationEnvelope},
    population::Population,
    projection::Projection,
    search::{SearchFields, build_search_filter},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatorConfig {
    /// Cap on documents returned by reads that skip pagination.
    pub max_unpaginated_results: u64,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            max_unpaginated_results: 1_000,
        }
    }
}

/// Per-call options supplied by the listing service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginateOptions {
    pub search_fields: SearchFields,
    /// Filter ANDed with the search predicate, e.g. an ownership scope.
    pub extra_filter: Filter,
    /// Echoed in the envelope's `filters` next to `search`.
    pub added_filters: Map<String, JsonValue>,
    pub population: Vec<Population>,
    /// Projection used when the query has no `select`.
    pub select_fields: Option<Projection>,
    /// Return every match, up to the configured cap, instead of one page.
    pub skip_paginate: bool,
    pub flags: ListFlags,
    pub add_id_to_search_text: bool,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    store: DocumentStoreArc,
    config: PaginatorConfig,
}

impl Paginator {
    pub fn new(store: DocumentStoreArc, config: PaginatorConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &DocumentStoreArc {
        &self.store
    }

    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Lists documents of `collection` and deserializes them into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a document does not deserialize.
    pub async fn paginate<T>(
        &self,
        collection: &str,
        query: &ListQuery,
        options: &PaginateOptions,
    ) -> RequestResult<PaginationEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let envelope = self.paginate_documents(collection, query, options).await?;
        Ok(envelope.try_map(|document| serde_json::from_value(JsonValue::Object(document)))?)
    }

    /// Lists raw documents of `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn paginate_documents(
        &self,
        collection: &str,
        query: &ListQuery,
        options: &PaginateOptions,
    ) -> RequestResult<PaginationEnvelope<Document>> {
        let flags = query.flags.union(options.flags);

        let mut filter = options.extra_filter.clone();
        if let Some(search) = query.search.as_deref().and_then(|search| {
            build_search_filter(
                search,
                &options.search_fields,
                flags.search_options(options.add_id_to_search_text),
            )
        }) {
            filter.add_conjunction(search);
        }
        debug!(%collection, %filter, "list filter");
        filter.validate()?;

        let total_items = if flags.skip_totals {
            None
        } else {
            Some(self.store.count(collection, &filter).await?)
        };

        let window = if options.skip_paginate {
            PageWindow::capped(self.config.max_unpaginated_results)
        } else {
            query.window()
        };
        let find_options = FindOptions {
            ordering: query.ordering.clone(),
            collation: (!flags.skip_collation && !query.ordering.is_empty())
                .then(Collation::turkish),
            skip: window.skip,
            limit: window.limit,
            projection: query.select.clone().or_else(|| options.select_fields.clone()),
        };
        debug!(
            %collection,
            ordering = %query.ordering,
            skip = window.skip,
            limit = ?window.limit,
            "list window"
        );
        let mut result = self.store.find(collection, &filter, &find_options).await?;

        if options.skip_paginate {
            let cap = usize::try_from(self.config.max_unpaginated_results).unwrap_or(usize::MAX);
            if result.len() >= cap {
                warn!(
                    %collection,
                    cap,
                    "unpaginated read reached the result cap, remaining documents were not returned"
                );
            }
        }

        if query.populate != Some(false) {
            for population in &options.population {
                population.apply(self.store.as_ref(), &mut result).await?;
            }
        }

        let mut filters = Map::new();
        filters.insert(
            "search".into(),
            query.search.clone().map_or(JsonValue::Null, JsonValue::String),
        );
        filters.extend(options.added_filters.clone());

        Ok(PaginationEnvelope {
            pagination: Pagination::new(query.page, query.limit, total_items, result.len()),
            sort: query.sort.clone(),
            filters,
            result,
        })
    }
}
