use realty_query::{
    filter::Filter,
    query::{
        list::{RawListQuery, SortSpec},
        paginate::PaginateOptions,
        pagination::PaginationEnvelope,
        search::SearchFields,
    },
    store::FindOptions,
};
use serde_json::Value as JsonValue;

use crate::{
    context::{QueryContext, added_filters},
    error::AppResult,
};

use super::{
    FEATURES,
    model::{Feature, FeatureListParams, FeatureType},
};

const SEARCH_FIELDS: [&str; 2] = ["name.tr", "name.en"];

#[derive(Debug, Clone)]
pub struct FeatureQueryManager {
    context: QueryContext,
}

impl FeatureQueryManager {
    pub fn new(context: QueryContext) -> Self {
        Self { context }
    }

    /// Lists features by name, optionally scoped to a feature or housing type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(
        &self,
        raw: &RawListQuery,
        params: &FeatureListParams,
    ) -> AppResult<PaginationEnvelope<Feature>> {
        let options = PaginateOptions {
            search_fields: SearchFields::text(SEARCH_FIELDS),
            extra_filter: scope(params),
            added_filters: added_filters(params)?,
            ..Default::default()
        };
        self.context.list(FEATURES, raw, &options).await
    }

    /// Lists quick filter features, by display order unless sorted otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_quick_filters(
        &self,
        raw: &RawListQuery,
        params: &FeatureListParams,
    ) -> AppResult<PaginationEnvelope<Feature>> {
        let mut raw = raw.clone();
        raw.sort
            .get_or_insert_with(|| SortSpec::new().with("order", 1).with("createdAt", 1));

        let mut added = added_filters(params)?;
        added.insert("isQuickFilter".into(), JsonValue::Bool(true));

        let options = PaginateOptions {
            search_fields: SearchFields::text(SEARCH_FIELDS),
            extra_filter: Filter::all([Filter::equal("isQuickFilter", true), scope(params)]),
            added_filters: added,
            ..Default::default()
        };
        self.context.list(FEATURES, &raw, &options).await
    }

    /// Every feature of the general type.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn general_features(&self) -> AppResult<Vec<Feature>> {
        self.of_type(FeatureType::General).await
    }

    /// Every feature of `feature_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn of_type(&self, feature_type: FeatureType) -> AppResult<Vec<Feature>> {
        let filter = Filter::equal("featureType", feature_type.as_str());
        self.context
            .find(FEATURES, &filter, FindOptions::default(), &[])
            .await
    }
}

fn scope(params: &FeatureListParams) -> Filter {
    let mut filter = Filter::default();
    if let Some(feature_type) = params.feature_type {
        filter.add_conjunction(Filter::equal("featureType", feature_type.as_str()));
    }
    if let Some(housing_type) = &params.housing_type {
        filter.add_conjunction(Filter::equal("housingType", housing_type.as_str()));
    }
    filter
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use realty_query::testing::fixtures::hotel_store;

    use crate::config::QuerySettings;

    use super::*;

    fn manager() -> FeatureQueryManager {
        FeatureQueryManager::new(QueryContext::new(
            Arc::new(hotel_store(1)),
            &QuerySettings::default(),
        ))
    }

    #[tokio::test]
    async fn quick_filters_by_order() {
        let envelope = manager()
            .find_quick_filters(&RawListQuery::default(), &FeatureListParams::default())
            .await
            .unwrap();
        let ids: Vec<_> = envelope.result.iter().map(|feature| feature.id.as_str()).collect();
        assert_eq!(ids, ["feature-2", "feature-1"]);
        assert_eq!(envelope.filters["isQuickFilter"], true);
        assert_eq!(envelope.sort.iter().map(|(field, _)| field).collect::<Vec<_>>(), ["order", "createdAt"]);
    }

    #[tokio::test]
    async fn scoped() {
        let manager = manager();
        let params = FeatureListParams {
            feature_type: Some(FeatureType::Inside),
            ..Default::default()
        };
        let envelope = manager.find_all(&RawListQuery::default(), &params).await.unwrap();
        assert_eq!(envelope.pagination.total_items, 1);
        assert_eq!(envelope.result[0].name["tr"], "İnternet");
        assert_eq!(envelope.filters["featureType"], "inside");

        let raw: RawListQuery = serde_json::from_value(serde_json::json!({"search": "park"})).unwrap();
        let envelope = manager.find_all(&raw, &FeatureListParams::default()).await.unwrap();
        assert_eq!(envelope.result.len(), 1);

        let general = manager.general_features().await.unwrap();
        assert_eq!(general.len(), 1);
        assert_eq!(general[0].id, "feature-2");
    }
}
