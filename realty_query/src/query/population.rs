//! # Population
//!
//! Replaces references stored at a document path with the referenced documents
//! from another collection. A population may select fields of the referenced
//! documents and populate them further.

use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{
    filter::Filter,
    store::{
        Document, DocumentStore, FindOptions,
        document::{get_path, id_key, set_path},
        error::StoreResult,
    },
};

use super::projection::Projection;

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    /// Path of the reference in the local document.
    pub path: String,
    /// Collection holding referenced documents.
    pub collection: String,
    /// Field of the referenced documents matched against the reference.
    pub foreign_field: String,
    pub select: Option<Projection>,
    pub populate: Option<Box<Population>>,
}

impl Population {
    pub fn new<P, C>(path: P, collection: C) -> Self
    where
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            path: path.into(),
            collection: collection.into(),
            foreign_field: "_id".into(),
            select: None,
            populate: None,
        }
    }

    pub fn with_foreign_field<S>(mut self, foreign_field: S) -> Self
    where
        S: Into<String>,
    {
        self.foreign_field = foreign_field.into();
        self
    }

    pub fn with_select(mut self, select: Projection) -> Self {
        self.select = Some(select);
        self
    }

    pub fn with_populate(mut self, population: Population) -> Self {
        self.populate = Some(Box::new(population));
        self
    }

    /// Populates `documents` in place.
    ///
    /// References are read from `path` as a single value or an array of values.
    /// A single reference without a match becomes `null`; unmatched references
    /// in an array are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the referenced collection fails.
    pub fn apply<'a, S>(
        &'a self,
        store: &'a S,
        documents: &'a mut [Document],
    ) -> BoxFuture<'a, StoreResult<()>>
    where
        S: DocumentStore + Send + Sync + ?Sized,
    {
        Box::pin(async move {
            let mut keys = Vec::new();
            for document in documents.iter() {
                match get_path(document, &self.path) {
                    Some(JsonValue::Array(references)) => keys.extend(references.iter().filter_map(id_key)),
                    Some(reference) => keys.extend(id_key(reference)),
                    None => {}
                }
            }
            keys.sort_unstable();
            keys.dedup();
            if keys.is_empty() {
                return Ok(());
            }

            let options = FindOptions {
                projection: self
                    .select
                    .clone()
                    .map(|select| select.retaining(&self.foreign_field)),
                ..Default::default()
            };
            let filter = Filter::any_of(self.foreign_field.as_str(), keys.iter().map(String::as_str));
            let mut related = store.find(&self.collection, &filter, &options).await?;
            debug!(
                path = %self.path,
                collection = %self.collection,
                references = keys.len(),
                found = related.len(),
                "populating references"
            );

            if let Some(nested) = &self.populate {
                nested.apply(store, &mut related).await?;
            }

            let related: HashMap<String, Document> = related
                .into_iter()
                .filter_map(|document| {
                    let key = get_path(&document, &self.foreign_field).and_then(id_key)?;
                    Some((key, document))
                })
                .collect();
            let lookup = |reference: &JsonValue| {
                id_key(reference)
                    .and_then(|key| related.get(&key))
                    .map(|document| JsonValue::Object(document.clone()))
            };

            for document in documents.iter_mut() {
                let populated = match get_path(document, &self.path) {
                    Some(JsonValue::Array(references)) => {
                        JsonValue::Array(references.iter().filter_map(lookup).collect())
                    }
                    Some(reference) => lookup(reference).unwrap_or(JsonValue::Null),
                    None => continue,
                };
                set_path(document, &self.path, populated);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::store::memory::MemoryDocumentStore;

    use super::*;

    fn document(value: JsonValue) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn store() -> MemoryDocumentStore {
        MemoryDocumentStore::with_data([
            (
                "users",
                vec![
                    document(json!({"_id": "u1", "firstName": "Ayşe", "password": "x", "cityId": "c1"})),
                    document(json!({"_id": "u2", "firstName": "Mehmet", "password": "y", "cityId": "c2"})),
                ],
            ),
            (
                "cities",
                vec![
                    document(json!({"_id": "c1", "name": "İzmir"})),
                    document(json!({"_id": "c2", "name": "Ankara"})),
                ],
            ),
        ])
    }

    #[tokio::test]
    async fn single_references() {
        let store = store();
        let mut messages = vec![
            document(json!({"_id": "m1", "sender": "u1"})),
            document(json!({"_id": "m2", "sender": "u3"})),
            document(json!({"_id": "m3"})),
        ];
        let population = Population::new("sender", "users")
            .with_select(Projection::exclude(["password"]))
            .with_populate(Population::new("cityId", "cities"));
        population.apply(&store, &mut messages).await.unwrap();

        assert_eq!(
            messages[0]["sender"],
            json!({"_id": "u1", "firstName": "Ayşe", "cityId": {"_id": "c1", "name": "İzmir"}})
        );
        assert_eq!(messages[1]["sender"], JsonValue::Null);
        assert!(!messages[2].contains_key("sender"));
    }

    #[tokio::test]
    async fn reference_arrays() {
        let store = store();
        let mut favorites = vec![document(json!({"users": ["u2", "u9", "u1"]}))];
        Population::new("users", "users")
            .with_select(Projection::include(["firstName"]))
            .apply(&store, &mut favorites)
            .await
            .unwrap();
        assert_eq!(
            favorites[0]["users"],
            json!([
                {"_id": "u2", "firstName": "Mehmet"},
                {"_id": "u1", "firstName": "Ayşe"},
            ])
        );
    }

    #[tokio::test]
    async fn foreign_fields() {
        let store = store();
        let mut cities = vec![document(json!({"_id": "c2", "name": "Ankara"}))];
        Population::new("_id", "users")
            .with_foreign_field("cityId")
            .with_select(Projection::include(["firstName"]))
            .apply(&store, &mut cities)
            .await
            .unwrap();
        assert_eq!(
            cities[0]["_id"],
            json!({"_id": "u2", "firstName": "Mehmet", "cityId": "c2"})
        );
    }
}
