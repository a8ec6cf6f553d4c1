use realty_query::{
    filter::Filter,
    query::{
        list::RawListQuery,
        paginate::PaginateOptions,
        pagination::{PageWindow, PaginationEnvelope},
        population::Population,
        search::SearchFields,
    },
    store::FindOptions,
};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{
    context::{QueryContext, added_filters},
    error::{AppError, AppResult},
    feature::FEATURES,
    user::{USERS, model::User},
};

use super::{
    HOTELS,
    criteria::{HotelFilterCriteria, HotelListParams},
    filter::{build_hotel_filter, build_hotel_list_filter},
    model::Hotel,
};

const SEARCH_FIELDS: [&str; 2] = ["title.en", "title.tr"];

#[derive(Debug, Clone)]
pub struct HotelQueryManager {
    context: QueryContext,
}

impl HotelQueryManager {
    pub fn new(context: QueryContext) -> Self {
        Self { context }
    }

    /// Lists hotels for administration, published or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(
        &self,
        raw: &RawListQuery,
        params: &HotelListParams,
    ) -> AppResult<PaginationEnvelope<Hotel>> {
        let options = PaginateOptions {
            search_fields: SearchFields::text(SEARCH_FIELDS),
            extra_filter: build_hotel_list_filter(params),
            added_filters: added_filters(params)?,
            ..Default::default()
        };
        self.context.list(HOTELS, raw, &options).await
    }

    /// Lists hotels managed by `manager_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_mine(
        &self,
        manager_id: &str,
        raw: &RawListQuery,
    ) -> AppResult<PaginationEnvelope<Hotel>> {
        let options = PaginateOptions {
            search_fields: SearchFields::text(SEARCH_FIELDS),
            extra_filter: Filter::equal("managerId", manager_id),
            added_filters: [("managerId".to_string(), JsonValue::from(manager_id))]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        self.context.list(HOTELS, raw, &options).await
    }

    /// Finds a published hotel by slug, with its features and manager.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if there is no such hotel, or an error if
    /// the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Hotel> {
        let filter = Filter::all([
            Filter::equal("slug", slug),
            Filter::not_equal("isPublished", false),
        ]);
        let options = FindOptions {
            limit: Some(1),
            ..Default::default()
        };
        let population = [
            Population::new("featureIds", FEATURES),
            Population::new("managerId", USERS).with_select(User::public_projection()),
        ];
        self.context
            .find(HOTELS, &filter, options, &population)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("hotel", slug))
    }

    /// Public listing search. Published hotels matching every criterion, nearest
    /// first when searching around a location.
    ///
    /// Criteria without `limit` return every match up to the unpaginated result
    /// cap; with `limit`, one page of matches.
    ///
    /// # Errors
    ///
    /// Returns an error if a criterion pattern is not a valid regex or the
    /// store fails.
    #[tracing::instrument(skip(self))]
    pub async fn filter_hotels(&self, criteria: &HotelFilterCriteria) -> AppResult<Vec<Hotel>> {
        let filter = build_hotel_filter(criteria);
        let window = match criteria.limit.filter(|limit| *limit > 0) {
            Some(limit) => PageWindow::page(criteria.page.unwrap_or(1).max(1), limit),
            None => PageWindow::default(),
        };
        debug!(skip = window.skip, limit = ?window.limit, "hotel filter window");

        let options = FindOptions {
            skip: window.skip,
            limit: window.limit,
            ..Default::default()
        };
        self.context.find(HOTELS, &filter, options, &[]).await
    }
}
