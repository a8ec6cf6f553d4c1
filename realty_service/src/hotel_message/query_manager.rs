use realty_query::{
    filter::Filter,
    query::{
        list::RawListQuery,
        paginate::PaginateOptions,
        pagination::PaginationEnvelope,
        population::Population,
        search::SearchFields,
    },
};
use serde_json::Value as JsonValue;

use crate::{
    context::QueryContext,
    error::AppResult,
    user::{USERS, model::User},
};

use super::{HOTEL_MESSAGES, model::HotelMessage};

#[derive(Debug, Clone)]
pub struct HotelMessageQueryManager {
    context: QueryContext,
}

impl HotelMessageQueryManager {
    pub fn new(context: QueryContext) -> Self {
        Self { context }
    }

    /// Lists messages about `hotel_id` with their senders.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_for_hotel(
        &self,
        hotel_id: &str,
        raw: &RawListQuery,
    ) -> AppResult<PaginationEnvelope<HotelMessage>> {
        let options = PaginateOptions {
            search_fields: SearchFields::text(["message", "firstName", "lastName", "email"]),
            extra_filter: Filter::equal("hotelId", hotel_id),
            added_filters: [("hotelId".to_string(), JsonValue::from(hotel_id))]
                .into_iter()
                .collect(),
            population: vec![
                Population::new("senderUserId", USERS).with_select(User::public_projection()),
            ],
            ..Default::default()
        };
        self.context.list(HOTEL_MESSAGES, raw, &options).await
    }
}
