use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{hotel::model::Hotel, model::Reference};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    /// Favorite hotel, populated on reads. `None` once the hotel is removed.
    #[serde(default)]
    pub hotel_id: Option<Reference<Hotel>>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
}

impl Favorite {
    pub fn hotel(&self) -> Option<&Hotel> {
        self.hotel_id.as_ref().and_then(Reference::populated)
    }
}
