use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use time::OffsetDateTime;

use crate::{
    feature::model::Feature,
    model::{GeoLocation, Localized, Reference},
    user::model::User,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Localized,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Localized>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Localized>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<Localized>,
    #[serde(default)]
    pub price: Vec<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathroom_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_room_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<Localized>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing_type: Option<Localized>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating_type: Option<Localized>,
    #[serde(default)]
    pub feature_ids: Vec<Reference<Feature>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<Reference<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_furnished: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchangeable: Option<bool>,
    /// Stored either as a flag or as free-form details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_eligible: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dues: Option<JsonValue>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_confirmed_by_admin: bool,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub favorite_count: i64,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
    /// Stored fields without a typed counterpart.
    #[serde(flatten)]
    pub other: Map<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default = "Price::default_currency")]
    pub currency: String,
}

impl Price {
    fn default_currency() -> String {
        "USD".into()
    }
}

impl Hotel {
    pub fn price_in(&self, currency: &str) -> Option<f64> {
        self.price
            .iter()
            .find(|price| price.currency.eq_ignore_ascii_case(currency))
            .and_then(|price| price.amount)
    }
}

#[cfg(test)]
mod tests {
    use realty_query::testing::fixtures::hotel_documents;

    use super::*;

    #[test]
    fn from_documents() {
        let hotels: Vec<Hotel> = hotel_documents(3)
            .into_iter()
            .map(|document| serde_json::from_value(JsonValue::Object(document)).unwrap())
            .collect();
        let hotel = &hotels[2];
        assert_eq!(hotel.id, "hotel-003");
        assert_eq!(hotel.title["tr"], "İzmir Körfez Evi 3");
        assert_eq!(hotel.room_count, Some(3));
        assert_eq!(hotel.price_in("usd"), Some(37.0));
        assert_eq!(hotel.feature_ids.len(), 3);
        assert_eq!(hotel.feature_ids[0], Reference::Id("feature-1".into()));
        assert!(hotel.is_published);
        assert!(hotel.other.is_empty());

        let value = serde_json::to_value(hotel).unwrap();
        assert_eq!(value["_id"], "hotel-003");
        assert_eq!(value["roomCount"], 3);
    }
}
