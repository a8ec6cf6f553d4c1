use std::{cmp, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use realty_common::id::Id;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use crate::{filter::Filter, store::document::resolve_path};

use super::{
    Document, DocumentStore, FindOptions,
    error::{StoreError, StoreResult},
};

/// In-memory implementation of the document store.
#[derive(Debug)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    /// Creates a new empty memory document store.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a new memory document store with initial data.
    ///
    /// # Arguments
    ///
    /// * `collections` - Documents per collection name, in insertion order
    pub fn with_data<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Document>)>,
        S: Into<String>,
    {
        Self {
            collections: Arc::new(RwLock::new(
                collections
                    .into_iter()
                    .map(|(name, documents)| (name.into(), documents))
                    .collect(),
            )),
        }
    }

    fn matching<'a>(documents: &'a [Document], filter: &Filter) -> StoreResult<Vec<&'a Document>> {
        let filter = filter.compile()?;
        Ok(documents
            .iter()
            .filter(|document| filter.matches(document))
            .collect())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(0);
        };
        Ok(Self::matching(documents, filter)?.len() as u64)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched = Self::matching(documents, filter)?;
        if !options.ordering.is_empty() {
            matched.sort_by(|a, b| options.ordering.evaluate(a, b, options.collation.as_ref()));
        } else if let Some((field, proximity)) = filter.proximity() {
            let distance = |document: &Document| {
                resolve_path(document, field)
                    .into_iter()
                    .filter_map(crate::filter::geo_point)
                    .map(|point| proximity.center.distance_meters(&point))
                    .reduce(f64::min)
                    .unwrap_or(f64::INFINITY)
            };
            matched.sort_by(|a, b| {
                distance(*a)
                    .partial_cmp(&distance(*b))
                    .unwrap_or(cmp::Ordering::Equal)
            });
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|document| match &options.projection {
                Some(projection) => projection.apply(document.clone()),
                None => document.clone(),
            })
            .collect())
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> StoreResult<Vec<String>> {
        let mut generated = Id::generate_multiple(documents.len()).into_iter();
        let mut ids = Vec::with_capacity(documents.len());
        let mut inserted = Vec::with_capacity(documents.len());
        for mut document in documents {
            let id = match document.get("_id") {
                Some(JsonValue::String(id)) => id.clone(),
                Some(id) => {
                    return Err(StoreError::InvalidDocument {
                        collection: collection.into(),
                        reason: format!("`_id` must be a string, got `{id}`"),
                    });
                }
                None => {
                    let id = generated.next().unwrap_or_else(Id::generate).to_string();
                    document.insert("_id".into(), id.clone().into());
                    id
                }
            };
            ids.push(id);
            inserted.push(document);
        }

        self.collections
            .write()
            .await
            .entry(collection.into())
            .or_default()
            .extend(inserted);
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use realty_common::geo::GeoPoint;
    use serde_json::json;

    use crate::{
        ordering::{Collation, Ordering},
        query::projection::Projection,
    };

    use super::*;

    fn document(value: JsonValue) -> Document {
        value.as_object().cloned().unwrap()
    }

    async fn store() -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        store
            .insert_many(
                "cities",
                vec![
                    document(json!({"name": "Zonguldak", "plate": 67, "location": [31.79, 41.45]})),
                    document(json!({"name": "Çorum", "plate": 19, "location": [34.95, 40.55]})),
                    document(json!({"name": "İzmir", "plate": 35, "location": [27.14, 38.42]})),
                    document(json!({"name": "Ankara", "plate": 6, "location": [32.85, 39.93]})),
                ],
            )
            .await
            .unwrap();
        store
    }

    fn names(documents: &[Document]) -> Vec<&str> {
        documents
            .iter()
            .map(|document| document["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn count_and_find() {
        let store = store().await;
        let filter = Filter::compare("plate", crate::filter::FilterComparator::Greater, 10);
        assert_eq!(store.count("cities", &filter).await.unwrap(), 3);
        assert_eq!(store.count("missing", &filter).await.unwrap(), 0);

        let found = store.find("cities", &filter, &FindOptions::default()).await.unwrap();
        assert_eq!(names(&found), vec!["Zonguldak", "Çorum", "İzmir"]);
        assert!(found.iter().all(|document| document["_id"].is_string()));
    }

    #[tokio::test]
    async fn sorted_windows() {
        let store = store().await;
        let ordering = Ordering::parse([("name", &json!("asc"))]).unwrap();
        let options = FindOptions {
            ordering: ordering.clone(),
            collation: Some(Collation::turkish()),
            ..Default::default()
        };
        let found = store.find("cities", &Filter::default(), &options).await.unwrap();
        assert_eq!(names(&found), vec!["Ankara", "Çorum", "İzmir", "Zonguldak"]);

        let options = FindOptions {
            skip: 1,
            limit: Some(2),
            projection: Some(Projection::include(["name"])),
            ..options
        };
        let found = store.find("cities", &Filter::default(), &options).await.unwrap();
        assert_eq!(names(&found), vec!["Çorum", "İzmir"]);
        assert!(found.iter().all(|document| document.len() == 2));

        let options = FindOptions {
            ordering,
            ..Default::default()
        };
        let found = store.find("cities", &Filter::default(), &options).await.unwrap();
        assert_eq!(names(&found), vec!["Ankara", "Zonguldak", "Çorum", "İzmir"]);
    }

    #[tokio::test]
    async fn nearest_first() {
        let store = store().await;
        let kirikkale = GeoPoint::new(33.51, 39.85);
        let filter = Filter::near("location", kirikkale, 300_000.0);
        let found = store.find("cities", &filter, &FindOptions::default()).await.unwrap();
        assert_eq!(names(&found), vec!["Ankara", "Çorum", "Zonguldak"]);
    }

    #[tokio::test]
    async fn insert_ids() {
        let store = MemoryDocumentStore::new();
        let ids = store
            .insert_many("users", vec![document(json!({"_id": "u1"})), document(json!({}))])
            .await
            .unwrap();
        assert_eq!(ids[0], "u1");
        assert!(realty_common::id::is_document_id(&ids[1]));

        let err = store
            .insert_many("users", vec![document(json!({"_id": 5}))])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument { .. }));
        assert_eq!(store.count("users", &Filter::default()).await.unwrap(), 2);
    }
}
