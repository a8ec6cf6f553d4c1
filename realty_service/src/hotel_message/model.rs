use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{model::Reference, user::model::User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelMessage {
    #[serde(rename = "_id")]
    pub id: String,
    /// Sender, populated on reads.
    #[serde(default)]
    pub sender_user_id: Option<Reference<User>>,
    pub hotel_id: String,
    pub message: String,
    #[serde(default)]
    pub is_initial_message: bool,
    #[serde(default)]
    pub i_want_to_see_property: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub email: String,
    #[serde(default)]
    pub is_seen: bool,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
}
