//! # Hotel filter pipeline
//!
//! Composes listing search criteria into a single store filter. Every present
//! constraint is ANDed; published-only is always part of the result.

use realty_query::{filter::Filter, value::Value};
use tracing::debug;

use crate::model::LANGUAGES;

use super::criteria::{HotelFilterCriteria, HotelListParams, HotelScope};

/// Inclusive range constraints as (field, min, max).
fn ranges(criteria: &HotelFilterCriteria) -> [(&'static str, Option<f64>, Option<f64>); 7] {
    [
        ("roomCount", criteria.min_room_count, criteria.max_room_count),
        ("bathroomCount", criteria.min_bathroom_count, criteria.max_bathroom_count),
        ("bedRoomCount", criteria.min_bed_room_count, criteria.max_bed_room_count),
        ("totalSize", criteria.min_total_size, criteria.max_total_size),
        ("buildYear", criteria.min_build_year, criteria.max_build_year),
        ("dues.amount", criteria.min_dues_amount, criteria.max_dues_amount),
        ("buildingAge", criteria.min_building_age, criteria.max_building_age),
    ]
}

/// Case-insensitive match on any localization of `field`.
fn localized_match(field: &str, pattern: &str) -> Filter {
    Filter::any(
        LANGUAGES
            .iter()
            .map(|language| Filter::regex_case_insensitive(format!("{field}.{language}"), pattern)),
    )
}

/// Categorical constraints shared by the public search and the admin list.
fn categorical<'a, const N: usize>(
    pairs: [(&'static str, Option<&'a String>); N],
) -> impl Iterator<Item = Filter> + 'a {
    pairs
        .into_iter()
        .filter_map(|(field, value)| Some(localized_match(field, value?)))
}

/// Builds the listing filter for public search criteria.
///
/// ```
/// use realty_service::hotel::{criteria::HotelFilterCriteria, filter::build_hotel_filter};
///
/// let criteria = HotelFilterCriteria {
///     min_room_count: Some(2.0),
///     is_furnished: Some(true),
///     ..Default::default()
/// };
/// assert_eq!(
///     build_hotel_filter(&criteria).to_string(),
///     "roomCount IN [2..] AND isFurnished = true AND isPublished != false",
/// );
/// ```
pub fn build_hotel_filter(criteria: &HotelFilterCriteria) -> Filter {
    let mut parts = Vec::new();

    if let Some(slug) = &criteria.slug {
        parts.push(Filter::equal("slug", slug.as_str()));
    }
    if let Some(title) = &criteria.title {
        parts.extend(
            title
                .iter()
                .filter(|(_, pattern)| !pattern.is_empty())
                .map(|(language, pattern)| {
                    Filter::regex_case_insensitive(format!("title.{language}"), pattern.as_str())
                }),
        );
    }
    if let Some(feature_ids) = criteria.feature_ids.as_ref().filter(|ids| !ids.is_empty()) {
        parts.push(Filter::contains_all("featureIds", feature_ids.iter().map(String::as_str)));
    }

    parts.extend(ranges(criteria).into_iter().filter_map(|(field, min, max)| {
        Filter::range(field, min.map(Value::from), max.map(Value::from))
    }));

    if criteria.currency.is_some() || criteria.min_price.is_some() || criteria.max_price.is_some() {
        let mut price = Vec::new();
        if let Some(currency) = &criteria.currency {
            price.push(Filter::equal("currency", currency.as_str()));
        }
        price.extend(Filter::range(
            "amount",
            criteria.min_price.map(Value::from),
            criteria.max_price.map(Value::from),
        ));
        parts.push(Filter::element_match("price", Filter::all(price)));
    }

    if let Some(listing_type) = &criteria.listing_type {
        parts.push(Filter::regex_case_insensitive("listingType.en", listing_type.as_str()));
    }

    if let Some((center, meters)) = criteria.proximity() {
        parts.push(Filter::near("location", center, meters));
    }

    for (field, flag) in [
        ("exchangeable", criteria.exchangeable),
        ("creditEligible", criteria.credit_eligible),
        ("isFurnished", criteria.is_furnished),
    ] {
        if let Some(flag) = flag {
            parts.push(Filter::equal(field, flag));
        }
    }

    parts.extend(categorical([
        ("usageStatus", criteria.usage_status.as_ref()),
        ("deedStatus", criteria.deed_status.as_ref()),
        ("heatingType", criteria.heating_type.as_ref()),
        ("source", criteria.source.as_ref()),
        ("generalFeatures", criteria.general_features.as_ref()),
        ("zoningStatus", criteria.zoning_status.as_ref()),
    ]));

    if let Some(search) = criteria.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(Filter::any(["title", "description", "address"].into_iter().flat_map(
            |field| {
                LANGUAGES.iter().map(move |language| {
                    Filter::regex_case_insensitive(format!("{field}.{language}"), search)
                })
            },
        )));
    }

    parts.push(Filter::not_equal("isPublished", false));

    let filter = Filter::all(parts);
    debug!(%filter, "built hotel filter");
    filter
}

/// Builds the scope filter of the admin hotel list.
pub fn build_hotel_list_filter(params: &HotelListParams) -> Filter {
    let mut parts = Vec::new();

    for (field, value) in [
        ("listingType", &params.listing_type),
        ("housingType", &params.housing_type),
        ("entranceType", &params.entrance_type),
    ] {
        if let Some(value) = value {
            parts.push(Filter::equal(format!("{field}.en"), value.as_str()));
        }
    }
    for (field, flag) in [
        ("exchangeable", params.exchangeable),
        ("creditEligible", params.credit_eligible),
        ("isFurnished", params.is_furnished),
    ] {
        if let Some(flag) = flag {
            parts.push(Filter::equal(field, flag));
        }
    }
    if let Some(building_age) = params.building_age {
        parts.push(Filter::equal("buildingAge", building_age));
    }
    parts.extend(categorical([
        ("usageStatus", params.usage_status.as_ref()),
        ("deedStatus", params.deed_status.as_ref()),
        ("heatingType", params.heating_type.as_ref()),
        ("source", params.source.as_ref()),
    ]));

    match params.scope {
        Some(HotelScope::Unpublished) => parts.push(Filter::equal("isPublished", false)),
        Some(HotelScope::Confirmed) => parts.push(Filter::equal("isConfirmedByAdmin", true)),
        Some(HotelScope::NotConfirmed) => {
            parts.push(Filter::not_equal("isConfirmedByAdmin", true));
        }
        None => {}
    }

    Filter::all(parts)
}

#[cfg(test)]
mod tests {
    use realty_common::geo::GeoPoint;
    use serde_json::json;

    use realty_query::store::Document;

    use super::*;

    fn criteria(value: serde_json::Value) -> HotelFilterCriteria {
        serde_json::from_value(value).unwrap()
    }

    fn document(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn published_only() {
        let filter = build_hotel_filter(&HotelFilterCriteria::default());
        assert_eq!(filter, Filter::not_equal("isPublished", false));
        assert!(filter.evaluate(&document(json!({"slug": "a"}))).unwrap());
        assert!(!filter.evaluate(&document(json!({"isPublished": false}))).unwrap());
    }

    #[test]
    fn feature_ids() {
        let filter = build_hotel_filter(&criteria(json!({"featureIds": ["A", "B"]})));
        assert!(filter.evaluate(&document(json!({"featureIds": ["A", "B", "C"]}))).unwrap());
        assert!(!filter.evaluate(&document(json!({"featureIds": ["A"]}))).unwrap());
    }

    #[test]
    fn price_element_match() {
        let filter = build_hotel_filter(&criteria(json!({
            "minPrice": 500,
            "maxPrice": 1500,
            "currency": "USD",
        })));
        let usd = document(json!({"price": [{"amount": 1000, "currency": "USD"}]}));
        let eur = document(json!({"price": [{"amount": 1000, "currency": "EUR"}]}));
        let split = document(json!({"price": [
            {"amount": 1000, "currency": "EUR"},
            {"amount": 5000, "currency": "USD"},
        ]}));
        assert!(filter.evaluate(&usd).unwrap());
        assert!(!filter.evaluate(&eur).unwrap());
        assert!(!filter.evaluate(&split).unwrap());
        assert_eq!(
            filter.to_document()["price"],
            json!({"$elemMatch": {"currency": "USD", "amount": {"$gte": 500.0, "$lte": 1500.0}}})
        );
    }

    #[test]
    fn proximity() {
        let filter = build_hotel_filter(&criteria(json!({
            "coordinates": [29.0, 41.0],
            "maxDistance": 5,
        })));
        assert_eq!(filter.proximity().map(|(_, p)| p.max_distance_meters), Some(5_000.0));
        assert_eq!(
            filter.to_document()["location"]["$near"]["$maxDistance"],
            json!(5_000.0)
        );
        assert_eq!(
            filter.proximity().map(|(_, p)| p.center),
            Some(GeoPoint::new(29.0, 41.0))
        );

        let filter = build_hotel_filter(&criteria(json!({"coordinates": [29.0, 41.0]})));
        assert_eq!(filter.proximity(), None);
    }

    #[test]
    fn ranges_and_localized() {
        let filter = build_hotel_filter(&criteria(json!({
            "minRoomCount": 2,
            "maxRoomCount": "3",
            "minDuesAmount": 100,
            "heatingType": "kombi",
            "listingType": "for sale",
            "title": {"tr": "deniz"},
        })));
        let hotel = document(json!({
            "title": {"tr": "Deniz Manzaralı Otel", "en": "Sea View Hotel"},
            "roomCount": 3,
            "dues": {"amount": 200},
            "heatingType": {"tr": "Kombi", "en": "Combi Boiler"},
            "listingType": {"tr": "Satılık", "en": "For Sale"},
        }));
        assert!(filter.evaluate(&hotel).unwrap());

        let mut four_rooms = hotel.clone();
        four_rooms.insert("roomCount".into(), json!(4));
        assert!(!filter.evaluate(&four_rooms).unwrap());

        // Listing type is matched in English only.
        let filter = build_hotel_filter(&criteria(json!({"listingType": "satılık"})));
        assert!(!filter.evaluate(&hotel).unwrap());
    }

    #[test]
    fn search() {
        let filter = build_hotel_filter(&criteria(json!({"search": "  konak ", "isFurnished": false})));
        let hotel = document(json!({
            "address": {"tr": "Alsancak, Konak"},
            "isFurnished": false,
        }));
        assert!(filter.evaluate(&hotel).unwrap());
        let Filter::Conjunction(parts) = &filter else {
            panic!("expected conjunction, got {filter}");
        };
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[1], Filter::Disjunction(search) if search.len() == 6));
    }

    #[test]
    fn admin_scope() {
        let params: HotelListParams = serde_json::from_value(json!({
            "listingType": "For Rent",
            "scope": "notConfirmed",
        }))
        .unwrap();
        let filter = build_hotel_list_filter(&params);
        assert!(filter.evaluate(&document(json!({
            "listingType": {"en": "For Rent"},
        })))
        .unwrap());
        assert!(!filter.evaluate(&document(json!({
            "listingType": {"en": "For Rent"},
            "isConfirmedByAdmin": true,
        })))
        .unwrap());
        assert!(build_hotel_list_filter(&HotelListParams::default()).is_empty());
    }
}
