//! Wiring of the document store and the list operation helpers.

use std::{collections::HashMap, fs, path::Path, sync::Arc};

use realty_query::{
    filter::Filter,
    query::{
        list::{ListQueryBuilder, RawListQuery},
        paginate::{PaginateOptions, Paginator},
        pagination::PaginationEnvelope,
        population::Population,
    },
    store::{Document, DocumentStoreArc, FindOptions, memory::MemoryDocumentStore},
};
#[cfg(feature = "mongodb")]
use realty_query::store::mongodb::{MongoDocumentStore, ObjectIdPaths};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value as JsonValue};
use tracing::{info, warn};

use crate::{
    config::{DatabaseConfig, QuerySettings},
    error::AppResult,
    favorite::query_manager::FavoriteQueryManager,
    feature::query_manager::FeatureQueryManager,
    distance_type::query_manager::DistanceTypeQueryManager,
    hotel::query_manager::HotelQueryManager,
    hotel_message::query_manager::HotelMessageQueryManager,
    saved_filter::query_manager::SavedFilterQueryManager,
    user::query_manager::UserQueryManager,
};

/// Shared state of every query manager.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub paginator: Paginator,
    pub list_query_builder: ListQueryBuilder,
}

/// Query managers for every entity.
#[derive(Debug, Clone)]
pub struct QueryManagers {
    pub hotels: HotelQueryManager,
    pub features: FeatureQueryManager,
    pub distance_types: DistanceTypeQueryManager,
    pub users: UserQueryManager,
    pub saved_filters: SavedFilterQueryManager,
    pub hotel_messages: HotelMessageQueryManager,
    pub favorites: FavoriteQueryManager,
}

impl QueryContext {
    pub fn new(store: DocumentStoreArc, settings: &QuerySettings) -> Self {
        Self {
            paginator: Paginator::new(store, settings.paginator_config()),
            list_query_builder: ListQueryBuilder::new(settings.list_query_config()),
        }
    }

    /// Opens the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed file cannot be read or the database is unreachable.
    pub async fn connect(database: &DatabaseConfig, settings: &QuerySettings) -> AppResult<Self> {
        let store: DocumentStoreArc = match database {
            DatabaseConfig::Memory { seed: None } => Arc::new(MemoryDocumentStore::new()),
            DatabaseConfig::Memory { seed: Some(seed) } => Arc::new(load_seed(seed)?),
            #[cfg(feature = "mongodb")]
            DatabaseConfig::MongoDb(mongo) => {
                info!(database = %mongo.database, "connecting to MongoDB");
                let object_id_paths =
                    ObjectIdPaths::new().with(crate::hotel::HOTELS, crate::hotel::OBJECT_ID_FIELDS);
                Arc::new(
                    MongoDocumentStore::connect(&mongo.uri, &mongo.database)
                        .await?
                        .with_object_id_paths(object_id_paths),
                )
            }
            #[cfg(not(feature = "mongodb"))]
            DatabaseConfig::MongoDb(_) => {
                return Err(crate::error::AppError::Internal(
                    "MongoDB support is not enabled, build with the `mongodb` feature".into(),
                ));
            }
        };
        Ok(Self::new(store, settings))
    }

    /// Normalizes `raw` and lists one page of `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid, the store fails or a document
    /// does not deserialize.
    pub async fn list<T>(
        &self,
        collection: &str,
        raw: &RawListQuery,
        options: &PaginateOptions,
    ) -> AppResult<PaginationEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let query = self.list_query_builder.build(raw)?;
        Ok(self.paginator.paginate(collection, &query, options).await?)
    }

    /// Reads matches of `filter` without counting, populated and deserialized.
    /// The read is capped at the unpaginated result limit.
    ///
    /// # Errors
    ///
    /// Returns an error if a regex of `filter` is invalid, the store fails or a
    /// document does not deserialize.
    pub async fn find<T>(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
        population: &[Population],
    ) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        filter.validate()?;
        let cap = self.paginator.config().max_unpaginated_results;
        let limit = options.limit.map_or(cap, |limit| limit.min(cap));
        let options = FindOptions {
            limit: Some(limit),
            ..options
        };

        let store = self.paginator.store();
        let mut documents = store.find(collection, filter, &options).await?;
        if limit == cap && u64::try_from(documents.len()).is_ok_and(|found| found >= cap) {
            warn!(%collection, cap, "read reached the result cap, remaining documents were not returned");
        }
        for population in population {
            population.apply(store.as_ref(), &mut documents).await?;
        }

        Ok(documents
            .into_iter()
            .map(|document| serde_json::from_value(JsonValue::Object(document)))
            .collect::<Result<_, _>>()?)
    }

    pub fn query_managers(&self) -> QueryManagers {
        QueryManagers {
            hotels: HotelQueryManager::new(self.clone()),
            features: FeatureQueryManager::new(self.clone()),
            distance_types: DistanceTypeQueryManager::new(self.clone()),
            users: UserQueryManager::new(self.clone()),
            saved_filters: SavedFilterQueryManager::new(self.clone()),
            hotel_messages: HotelMessageQueryManager::new(self.clone()),
            favorites: FavoriteQueryManager::new(self.clone()),
        }
    }
}

/// Non-null fields of `params`, echoed in list envelopes.
///
/// # Errors
///
/// Returns an error if `params` does not serialize.
pub fn added_filters<T>(params: &T) -> AppResult<Map<String, JsonValue>>
where
    T: Serialize,
{
    let JsonValue::Object(mut filters) = serde_json::to_value(params)? else {
        return Ok(Map::new());
    };
    filters.retain(|_, value| !value.is_null());
    Ok(filters)
}

fn load_seed(path: &Path) -> AppResult<MemoryDocumentStore> {
    let collections: HashMap<String, Vec<Document>> = serde_json::from_slice(&fs::read(path)?)?;
    info!(
        path = %path.display(),
        collections = collections.len(),
        "seeding memory store"
    );
    Ok(MemoryDocumentStore::with_data(collections))
}
