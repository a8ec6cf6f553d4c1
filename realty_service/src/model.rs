//! Shared model types.

use std::collections::BTreeMap;

use realty_common::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// Text per language code, e.g. `{"tr": "Satılık", "en": "For Sale"}`.
pub type Localized = BTreeMap<String, String>;

/// Languages every localized field is expected to carry.
pub const LANGUAGES: [&str; 2] = ["tr", "en"];

/// GeoJSON point, `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(rename = "type", default = "GeoLocation::point_type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

impl GeoLocation {
    fn point_type() -> String {
        "Point".into()
    }

    pub fn point(&self) -> Option<GeoPoint> {
        GeoPoint::from_coordinates(&self.coordinates)
    }
}

/// Text stored either per language or as a single string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Localized(Localized),
    Plain(String),
}

/// Reference to another document, replaced by the document once populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Populated(Box<T>),
    Id(String),
}

impl Text {
    /// Text in `language`, falling back to the plain form.
    pub fn get(&self, language: &str) -> Option<&str> {
        match self {
            Self::Localized(text) => text.get(language).map(String::as_str),
            Self::Plain(text) => Some(text),
        }
    }
}

impl<T> Reference<T> {
    pub fn populated(&self) -> Option<&T> {
        match self {
            Self::Populated(document) => Some(document),
            Self::Id(_) => None,
        }
    }
}

impl From<GeoPoint> for GeoLocation {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: Self::point_type(),
            coordinates: point.coordinates().to_vec(),
        }
    }
}
