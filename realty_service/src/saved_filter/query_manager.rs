use realty_query::{
    filter::Filter,
    ordering::{Ordering, OrderingDirection, OrderingTerm},
    query::{
        list::RawListQuery,
        paginate::PaginateOptions,
        pagination::PaginationEnvelope,
        search::SearchFields,
    },
    store::FindOptions,
};

use crate::{context::QueryContext, error::AppResult};

use super::{SAVED_FILTERS, model::SavedFilter};

#[derive(Debug, Clone)]
pub struct SavedFilterQueryManager {
    context: QueryContext,
}

impl SavedFilterQueryManager {
    pub fn new(context: QueryContext) -> Self {
        Self { context }
    }

    /// Lists saved filters of all users by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self, raw: &RawListQuery) -> AppResult<PaginationEnvelope<SavedFilter>> {
        let options = PaginateOptions {
            search_fields: SearchFields::text(["filterName"]),
            ..Default::default()
        };
        self.context.list(SAVED_FILTERS, raw, &options).await
    }

    /// Every saved filter of `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_all_by_user(&self, user_id: &str) -> AppResult<Vec<SavedFilter>> {
        self.find(Filter::equal("userId", user_id)).await
    }

    /// Saved filters of `user_id` with either notification channel enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_with_notifications(&self, user_id: &str) -> AppResult<Vec<SavedFilter>> {
        self.find(Filter::all([
            Filter::equal("userId", user_id),
            Filter::any([
                Filter::equal("enableNotifications", true),
                Filter::equal("enableMailNotifications", true),
            ]),
        ]))
        .await
    }

    async fn find(&self, filter: Filter) -> AppResult<Vec<SavedFilter>> {
        let options = FindOptions {
            ordering: Ordering::new(vec![OrderingTerm {
                name: "createdAt".into(),
                direction: OrderingDirection::Descending,
            }]),
            ..Default::default()
        };
        self.context.find(SAVED_FILTERS, &filter, options, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use realty_query::store::memory::MemoryDocumentStore;
    use serde_json::json;

    use crate::config::QuerySettings;

    use super::*;

    fn manager() -> SavedFilterQueryManager {
        let documents = [
            json!({
                "_id": "f1",
                "filterName": "Denize yakın",
                "userId": "user-1",
                "enableMailNotifications": true,
                "minPrice": 1000,
                "createdAt": "2024-03-01T10:00:00Z",
            }),
            json!({
                "_id": "f2",
                "filterName": "Bahçeli ev",
                "userId": "user-1",
                "selectedFeatures": [],
                "createdAt": "2024-03-02T10:00:00Z",
            }),
            json!({
                "_id": "f3",
                "filterName": "Merkez",
                "userId": "user-2",
                "enableNotifications": true,
                "createdAt": "2024-03-03T10:00:00Z",
            }),
        ]
        .into_iter()
        .filter_map(|document| document.as_object().cloned())
        .collect();
        let store = MemoryDocumentStore::with_data([(SAVED_FILTERS, documents)]);
        SavedFilterQueryManager::new(QueryContext::new(Arc::new(store), &QuerySettings::default()))
    }

    #[tokio::test]
    async fn by_user() {
        let manager = manager();
        let filters = manager.find_all_by_user("user-1").await.unwrap();
        let ids: Vec<_> = filters.iter().map(|filter| filter.id.as_str()).collect();
        assert_eq!(ids, ["f2", "f1"]);
        assert!(filters[0].other.contains_key("selectedFeatures"));

        let notifying = manager.find_with_notifications("user-1").await.unwrap();
        assert_eq!(notifying.len(), 1);
        assert!(notifying[0].notifies());
        assert_eq!(notifying[0].min_price, Some(1000.0));
    }

    #[tokio::test]
    async fn by_name() {
        let raw: RawListQuery = serde_json::from_value(json!({"search": "bahçe"})).unwrap();
        let envelope = manager().find_all(&raw).await.unwrap();
        assert_eq!(envelope.pagination.total_items, 1);
        assert_eq!(envelope.result[0].user_id, "user-1");
    }
}
