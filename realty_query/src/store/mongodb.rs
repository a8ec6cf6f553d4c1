use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, Bson, oid::ObjectId},
    options::{Collation as MongoCollation, FindOptions as MongoFindOptions},
};
use realty_common::geo::EARTH_RADIUS_METERS;
use serde_json::{Map, Value as JsonValue, json};
use tracing::trace;

use crate::filter::Filter;

use super::{
    Document, DocumentStore, FindOptions,
    error::{StoreError, StoreResult},
};

/// Document store backed by a MongoDB database.
///
/// Documents cross the boundary as relaxed extended JSON. Object ids are
/// returned as hex strings. Hex strings under `_id` and under the configured
/// [`ObjectIdPaths`] are sent as object ids.
#[derive(Debug, Clone)]
pub struct MongoDocumentStore {
    database: Database,
    object_id_paths: ObjectIdPaths,
}

/// Field paths stored as object ids, per collection.
///
/// `_id` is always an object id path. Paths are dotted from the document root,
/// so `distances.typeId` covers `typeId` inside every `distances` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectIdPaths(HashMap<String, Vec<String>>);

impl ObjectIdPaths {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with<C, I, S>(mut self, collection: C, paths: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(collection.into())
            .or_default()
            .extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn contains(&self, collection: &str, path: &str) -> bool {
        path == "_id"
            || path.ends_with("._id")
            || self
                .0
                .get(collection)
                .is_some_and(|paths| paths.iter().any(|known| known == path))
    }
}

impl MongoDocumentStore {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            object_id_paths: ObjectIdPaths::default(),
        }
    }

    #[must_use]
    pub fn with_object_id_paths(mut self, object_id_paths: ObjectIdPaths) -> Self {
        self.object_id_paths = object_id_paths;
        self
    }

    /// Connects to `uri` and uses `database`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid.
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = mongodb::Client::with_uri_str(uri).await?;
        Ok(Self::new(client.database(database)))
    }

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.database.collection(name)
    }

    fn to_bson_document(&self, collection: &str, value: JsonValue) -> StoreResult<bson::Document> {
        to_bson_document(collection, value, &self.object_id_paths)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        // `$near` is not allowed in counts.
        let mut rendered = filter.to_document();
        near_to_within(&mut rendered);
        let filter = self.to_bson_document(collection, rendered)?;
        trace!(%collection, ?filter, "count");
        Ok(self.collection(collection).count_documents(filter).await?)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let filter = self.to_bson_document(collection, filter.to_document())?;
        let sort = if options.ordering.is_empty() {
            None
        } else {
            Some(self.to_bson_document(collection, options.ordering.to_document())?)
        };
        let projection = options
            .projection
            .as_ref()
            .map(|projection| self.to_bson_document(collection, projection.to_document()))
            .transpose()?;
        let collation = options.collation.as_ref().map(|collation| {
            MongoCollation::builder()
                .locale(collation.locale.clone())
                .case_level(collation.case_level)
                .build()
        });
        let find_options = MongoFindOptions::builder()
            .sort(sort)
            .skip((options.skip > 0).then_some(options.skip))
            .limit(options.limit.map(|limit| i64::try_from(limit).unwrap_or(i64::MAX)))
            .projection(projection)
            .collation(collation)
            .build();
        trace!(%collection, ?filter, ?find_options, "find");

        let documents: Vec<bson::Document> = self
            .collection(collection)
            .find(filter)
            .with_options(find_options)
            .await?
            .try_collect()
            .await?;
        documents
            .into_iter()
            .map(|document| from_bson_document(collection, document))
            .collect()
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> StoreResult<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let count = documents.len();
        let documents = documents
            .into_iter()
            .map(|document| self.to_bson_document(collection, JsonValue::Object(document)))
            .collect::<StoreResult<Vec<_>>>()?;
        let inserted = self.collection(collection).insert_many(documents).await?;
        (0..count)
            .map(|index| match inserted.inserted_ids.get(&index) {
                Some(Bson::ObjectId(id)) => Ok(id.to_hex()),
                Some(Bson::String(id)) => Ok(id.clone()),
                other => Err(StoreError::InvalidDocument {
                    collection: collection.into(),
                    reason: format!("unexpected inserted id {other:?}"),
                }),
            })
            .collect()
    }
}

fn to_bson_document(
    collection: &str,
    mut value: JsonValue,
    object_id_paths: &ObjectIdPaths,
) -> StoreResult<bson::Document> {
    object_ids(&mut value, None, &|path| object_id_paths.contains(collection, path));
    match Bson::try_from(value) {
        Ok(Bson::Document(document)) => Ok(document),
        Ok(other) => Err(StoreError::InvalidDocument {
            collection: collection.into(),
            reason: format!("expected a document, got {other}"),
        }),
        Err(err) => Err(StoreError::InvalidDocument {
            collection: collection.into(),
            reason: err.to_string(),
        }),
    }
}

fn from_bson_document(collection: &str, document: bson::Document) -> StoreResult<Document> {
    let mut value = Bson::Document(document).into_relaxed_extjson();
    hex_ids(&mut value);
    match value {
        JsonValue::Object(document) => Ok(document),
        other => Err(StoreError::InvalidDocument {
            collection: collection.into(),
            reason: format!("expected a document, got {other}"),
        }),
    }
}

/// Rewrites hex strings at object id paths as `$oid`.
///
/// `path` is the field path of `value` from the document root. Logical
/// operators start a new root, other operators keep the path of their field.
fn object_ids(value: &mut JsonValue, path: Option<&str>, is_object_id: &dyn Fn(&str) -> bool) {
    match value {
        JsonValue::String(s)
            if path.is_some_and(is_object_id) && ObjectId::parse_str(s.as_str()).is_ok() =>
        {
            let hex = s.clone();
            *value = json!({ "$oid": hex });
        }
        JsonValue::Array(items) => {
            for item in items {
                object_ids(item, path, is_object_id);
            }
        }
        JsonValue::Object(map) if !is_extended(map) => {
            for (key, item) in map.iter_mut() {
                let nested;
                let path = match (key.as_str(), path) {
                    ("$and" | "$or" | "$nor" | "$regex" | "$options" | "$search", _) => None,
                    (operator, path) if operator.starts_with('$') => path,
                    (field, Some(path)) => {
                        nested = format!("{path}.{field}");
                        Some(nested.as_str())
                    }
                    (field, None) => Some(field),
                };
                object_ids(item, path, is_object_id);
            }
        }
        _ => {}
    }
}

/// Replaces `{"$oid": hex}` with `hex`.
fn hex_ids(value: &mut JsonValue) {
    match value {
        JsonValue::Object(map) => {
            if let (1, Some(JsonValue::String(hex))) = (map.len(), map.get("$oid")) {
                *value = JsonValue::String(hex.clone());
                return;
            }
            for item in map.values_mut() {
                hex_ids(item);
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                hex_ids(item);
            }
        }
        _ => {}
    }
}

fn is_extended(map: &Map<String, JsonValue>) -> bool {
    map.len() == 1 && map.keys().all(|key| key == "$oid" || key == "$date")
}

/// Rewrites `$near` into the equivalent `$geoWithin` sphere.
fn near_to_within(value: &mut JsonValue) {
    match value {
        JsonValue::Object(map) => {
            if let Some(near) = map.remove("$near") {
                let center = near
                    .pointer("/$geometry/coordinates")
                    .cloned()
                    .unwrap_or(JsonValue::Null);
                let radians = near
                    .get("$maxDistance")
                    .and_then(JsonValue::as_f64)
                    .map_or(f64::MAX, |meters| meters / EARTH_RADIUS_METERS);
                map.insert(
                    "$geoWithin".into(),
                    json!({ "$centerSphere": [center, radians] }),
                );
            }
            for item in map.values_mut() {
                near_to_within(item);
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                near_to_within(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use realty_common::geo::GeoPoint;

    use super::*;

    const HEX: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    fn hotel_paths() -> ObjectIdPaths {
        ObjectIdPaths::new().with("hotels", ["featureIds", "managerId", "distances.typeId"])
    }

    fn object_id() -> Bson {
        Bson::ObjectId(ObjectId::parse_str(HEX).unwrap())
    }

    #[test]
    fn ids() {
        let filter = Filter::any([
            Filter::equal("_id", HEX),
            Filter::any_of("_id", [HEX, "not-an-id"]),
            Filter::equal("slug", HEX),
        ]);
        let filter = to_bson_document("hotels", filter.to_document(), &ObjectIdPaths::new()).unwrap();
        let parts = filter.get_array("$or").unwrap();
        let part = |index: usize| parts[index].as_document().unwrap();
        assert_eq!(part(0).get("_id"), Some(&object_id()));
        assert_eq!(
            part(1).get_document("_id").unwrap().get_array("$in").unwrap(),
            &vec![object_id(), Bson::String("not-an-id".into())]
        );
        assert_eq!(part(2).get("slug"), Some(&Bson::String(HEX.into())));

        let mut document = json!({"_id": {"$oid": HEX}, "owner": {"$oid": HEX}, "n": 1});
        hex_ids(&mut document);
        assert_eq!(document, json!({"_id": HEX, "owner": HEX, "n": 1}));
    }

    #[test]
    fn hotel_references() {
        let filter = Filter::all([
            Filter::contains_all("featureIds", [HEX]),
            Filter::equal("managerId", HEX),
            Filter::element_match("distances", Filter::equal("typeId", HEX)),
        ]);
        let filter = to_bson_document("hotels", filter.to_document(), &hotel_paths()).unwrap();
        assert_eq!(
            filter.get_document("featureIds").unwrap().get_array("$all").unwrap(),
            &vec![object_id()]
        );
        assert_eq!(filter.get("managerId"), Some(&object_id()));
        assert_eq!(
            filter
                .get_document("distances")
                .unwrap()
                .get_document("$elemMatch")
                .unwrap()
                .get("typeId"),
            Some(&object_id())
        );

        // Paths are per collection.
        let filter = Filter::equal("managerId", HEX);
        let filter = to_bson_document("favorites", filter.to_document(), &hotel_paths()).unwrap();
        assert_eq!(filter.get("managerId"), Some(&Bson::String(HEX.into())));

        let hotel = json!({
            "featureIds": [HEX, HEX],
            "distances": [{"typeId": HEX, "value": 300}],
            "slug": HEX,
        });
        let hotel = to_bson_document("hotels", hotel, &hotel_paths()).unwrap();
        assert_eq!(hotel.get_array("featureIds").unwrap(), &vec![object_id(), object_id()]);
        assert_eq!(
            hotel.get_array("distances").unwrap()[0].as_document().unwrap().get("typeId"),
            Some(&object_id())
        );
        assert_eq!(hotel.get("slug"), Some(&Bson::String(HEX.into())));
    }

    #[test]
    fn counted_proximity() {
        let mut filter =
            Filter::near("location", GeoPoint::new(27.14, 38.42), EARTH_RADIUS_METERS).to_document();
        near_to_within(&mut filter);
        assert_eq!(
            filter,
            json!({"location": {"$geoWithin": {"$centerSphere": [[27.14, 38.42], 1.0]}}})
        );
    }
}
