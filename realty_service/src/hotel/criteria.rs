//! Filter criteria for hotel listings.
//!
//! Criteria arrive as query-string shaped JSON, so numbers and flags are
//! accepted either typed or as strings.

use std::fmt::{self, Formatter};

use realty_common::geo::GeoPoint;
use realty_query::query::utility::{deserialize_lenient, deserialize_lenient_list};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, SeqAccess, Visitor},
};

use crate::model::Localized;

/// Public listing search criteria. Every present constraint must hold.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelFilterCriteria {
    pub search: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub page: Option<u32>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub limit: Option<u32>,
    pub slug: Option<String>,
    /// Title pattern per language code.
    pub title: Option<Localized>,
    /// Listings must carry all of these features.
    #[serde(deserialize_with = "deserialize_lenient_list")]
    pub feature_ids: Option<Vec<String>>,

    #[serde(deserialize_with = "deserialize_lenient")]
    pub min_price: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_price: Option<f64>,
    pub currency: Option<String>,

    #[serde(deserialize_with = "deserialize_lenient")]
    pub min_room_count: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_room_count: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub min_bathroom_count: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_bathroom_count: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub min_bed_room_count: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_bed_room_count: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub min_total_size: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_total_size: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub min_build_year: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_build_year: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub min_dues_amount: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_dues_amount: Option<f64>,
    #[serde(alias = "buildingAge", deserialize_with = "deserialize_lenient")]
    pub min_building_age: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_building_age: Option<f64>,

    /// Matched against the English listing type only.
    pub listing_type: Option<String>,

    /// Search center as `[longitude, latitude]`.
    #[serde(deserialize_with = "deserialize_coordinates")]
    pub coordinates: Option<GeoPoint>,
    /// Search radius in kilometers.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max_distance: Option<f64>,

    #[serde(deserialize_with = "deserialize_lenient")]
    pub exchangeable: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub credit_eligible: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub is_furnished: Option<bool>,

    pub usage_status: Option<String>,
    pub deed_status: Option<String>,
    pub heating_type: Option<String>,
    pub source: Option<String>,
    pub general_features: Option<String>,
    pub zoning_status: Option<String>,
}

/// Optional scoping of the admin hotel list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelListParams {
    pub listing_type: Option<String>,
    pub housing_type: Option<String>,
    pub entrance_type: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub exchangeable: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub credit_eligible: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub is_furnished: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub building_age: Option<f64>,
    pub usage_status: Option<String>,
    pub deed_status: Option<String>,
    pub heating_type: Option<String>,
    pub source: Option<String>,
    pub scope: Option<HotelScope>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HotelScope {
    Unpublished,
    Confirmed,
    NotConfirmed,
}

impl HotelFilterCriteria {
    /// Proximity constraint in meters, present only with both center and radius.
    pub fn proximity(&self) -> Option<(GeoPoint, f64)> {
        let center = self.coordinates?;
        let kilometers = self.max_distance?;
        Some((center, realty_common::geo::kilometers_to_meters(kilometers)))
    }
}

/// Accepts `[29.0, 41.0]`, `["29.0", "41.0"]` or `"29.0,41.0"`.
fn deserialize_coordinates<'de, D>(deserializer: D) -> Result<Option<GeoPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CoordinatesVisitor;

    impl<'de> Visitor<'de> for CoordinatesVisitor {
        type Value = Option<GeoPoint>;

        fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str("a [longitude, latitude] pair")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            if value.trim().is_empty() {
                return Ok(None);
            }
            let coordinates = value
                .split(',')
                .map(|part| part.trim().parse::<f64>().map_err(E::custom))
                .collect::<Result<Vec<_>, _>>()?;
            point(&coordinates).map(Some)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            #[derive(Deserialize)]
            #[serde(untagged)]
            enum Coordinate {
                Number(f64),
                Text(String),
            }

            let mut coordinates = Vec::new();
            while let Some(coordinate) = seq.next_element::<Coordinate>()? {
                coordinates.push(match coordinate {
                    Coordinate::Number(number) => number,
                    Coordinate::Text(text) => text
                        .trim()
                        .parse::<f64>()
                        .map_err(<A::Error as de::Error>::custom)?,
                });
            }
            point(&coordinates).map(Some)
        }
    }

    fn point<E: de::Error>(coordinates: &[f64]) -> Result<GeoPoint, E> {
        GeoPoint::from_coordinates(coordinates)
            .ok_or_else(|| E::custom(format!("expected [longitude, latitude], got {coordinates:?}")))
    }

    deserializer.deserialize_option(CoordinatesVisitor)
}
