use realty_query::{
    filter::Filter,
    query::{
        list::RawListQuery,
        paginate::PaginateOptions,
        pagination::PaginationEnvelope,
        population::Population,
    },
};
use serde_json::Value as JsonValue;

use crate::{
    context::QueryContext,
    error::AppResult,
    feature::FEATURES,
    hotel::HOTELS,
};

use super::{FAVORITES, model::Favorite};

#[derive(Debug, Clone)]
pub struct FavoriteQueryManager {
    context: QueryContext,
}

impl FavoriteQueryManager {
    pub fn new(context: QueryContext) -> Self {
        Self { context }
    }

    /// Lists favorites of `user_id` with their hotels and the hotels' features.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_for_user(
        &self,
        user_id: &str,
        raw: &RawListQuery,
    ) -> AppResult<PaginationEnvelope<Favorite>> {
        let options = PaginateOptions {
            extra_filter: Filter::equal("userId", user_id),
            added_filters: [("userId".to_string(), JsonValue::from(user_id))]
                .into_iter()
                .collect(),
            population: vec![
                Population::new("hotelId", HOTELS)
                    .with_populate(Population::new("featureIds", FEATURES)),
            ],
            ..Default::default()
        };
        self.context.list(FAVORITES, raw, &options).await
    }
}
