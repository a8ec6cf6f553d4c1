use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::model::Localized;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Localized,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Localized>,
    #[serde(default)]
    pub icon_url: String,
    pub feature_type: FeatureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing_type: Option<String>,
    #[serde(default)]
    pub is_quick_filter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureType {
    Inside,
    Outside,
    General,
    Face,
    ForOldsAndDisabled,
}

impl FeatureType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::Outside => "outside",
            Self::General => "general",
            Self::Face => "face",
            Self::ForOldsAndDisabled => "for-olds-and-disabled",
        }
    }
}

/// Optional scoping of feature lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureListParams {
    pub feature_type: Option<FeatureType>,
    pub housing_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use realty_query::testing::fixtures::feature_documents;
    use serde_json::Value as JsonValue;

    use super::*;

    #[test]
    fn from_documents() {
        let features: Vec<Feature> = feature_documents()
            .into_iter()
            .map(|document| serde_json::from_value(JsonValue::Object(document)).unwrap())
            .collect();
        assert_eq!(features[0].name["en"], "Pool");
        assert_eq!(features[0].feature_type, FeatureType::Outside);
        assert!(features[0].is_quick_filter);
        assert!(!features[2].is_quick_filter);

        let feature_type: FeatureType = serde_json::from_str(r#""for-olds-and-disabled""#).unwrap();
        assert_eq!(feature_type, FeatureType::ForOldsAndDisabled);
        assert_eq!(serde_json::to_value(feature_type).unwrap(), feature_type.as_str());
    }
}
