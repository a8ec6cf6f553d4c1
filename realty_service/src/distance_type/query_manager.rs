use realty_query::query::{
    list::RawListQuery,
    paginate::PaginateOptions,
    pagination::PaginationEnvelope,
    search::SearchFields,
};

use crate::{context::QueryContext, error::AppResult};

use super::{DISTANCE_TYPES, model::DistanceType};

#[derive(Debug, Clone)]
pub struct DistanceTypeQueryManager {
    context: QueryContext,
}

impl DistanceTypeQueryManager {
    pub fn new(context: QueryContext) -> Self {
        Self { context }
    }

    /// Lists distance types by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self, raw: &RawListQuery) -> AppResult<PaginationEnvelope<DistanceType>> {
        let options = PaginateOptions {
            search_fields: SearchFields::text(["name.tr", "name.en"]),
            ..Default::default()
        };
        self.context.list(DISTANCE_TYPES, raw, &options).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use realty_query::store::memory::MemoryDocumentStore;
    use serde_json::json;

    use crate::{config::QuerySettings, distance_type::model::DistanceUnit};

    use super::*;

    #[tokio::test]
    async fn by_name() {
        let documents = [
            json!({"_id": "d1", "name": {"tr": "Okul", "en": "School"}, "unit": "m"}),
            json!({"_id": "d2", "name": {"tr": "Havalimanı", "en": "Airport"}, "unit": "km"}),
        ]
        .into_iter()
        .filter_map(|document| document.as_object().cloned())
        .collect();
        let store = MemoryDocumentStore::with_data([(DISTANCE_TYPES, documents)]);
        let manager = DistanceTypeQueryManager::new(QueryContext::new(
            Arc::new(store),
            &QuerySettings::default(),
        ));

        let raw: RawListQuery = serde_json::from_value(json!({"search": "airport"})).unwrap();
        let envelope = manager.find_all(&raw).await.unwrap();
        assert_eq!(envelope.result.len(), 1);
        let airport = &envelope.result[0];
        assert_eq!(airport.name.get("tr"), Some("Havalimanı"));
        assert_eq!(airport.unit, DistanceUnit::Km);
        assert!((airport.unit.to_meters(2.5) - 2_500.0).abs() < f64::EPSILON);
    }
}
