use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    #[serde(rename = "_id")]
    pub id: String,
    pub filter_name: String,
    pub user_id: String,
    #[serde(default)]
    pub enable_notifications: bool,
    #[serde(default)]
    pub enable_mail_notifications: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathroom_count: Option<f64>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    /// Remaining search state, stored as sent by clients.
    #[serde(flatten)]
    pub other: Map<String, JsonValue>,
}

impl SavedFilter {
    pub fn notifies(&self) -> bool {
        self.enable_notifications || self.enable_mail_notifications
    }
}
