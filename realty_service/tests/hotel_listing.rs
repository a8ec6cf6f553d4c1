use std::sync::Arc;

use http::StatusCode;
use realty_query::{
    error::{ErrorBody, RequestError},
    query::{error::QueryError, list::RawListQuery, pagination::Pagination},
    testing::fixtures::hotel_store,
};
use realty_service::{
    config::QuerySettings,
    context::{QueryContext, QueryManagers},
    error::AppError,
    hotel::criteria::{HotelFilterCriteria, HotelListParams},
};
use serde_json::{Value as JsonValue, json};

fn managers(hotels: usize) -> QueryManagers {
    QueryContext::new(Arc::new(hotel_store(hotels)), &QuerySettings::default()).query_managers()
}

fn raw(value: JsonValue) -> RawListQuery {
    serde_json::from_value(value).unwrap()
}

fn criteria(value: JsonValue) -> HotelFilterCriteria {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn second_page() {
    let envelope = managers(25)
        .hotels
        .find_all(&raw(json!({"page": "2", "limit": "10"})), &HotelListParams::default())
        .await
        .unwrap();
    assert_eq!(
        envelope.pagination,
        Pagination {
            page: 2,
            limit: 10,
            total_items: 25,
            total_pages: 3,
            showing: 10,
        }
    );
    assert_eq!(envelope.result[0].id, "hotel-011");

    let body = serde_json::to_value(&envelope).unwrap();
    assert_eq!(body["pagination"]["totalItems"], 25);
    assert_eq!(body["filters"], json!({"search": null}));
}

#[tokio::test]
async fn invalid_queries() {
    let managers = managers(5);
    let err = managers
        .hotels
        .find_all(&raw(json!({"limit": 101})), &HotelListParams::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Request(RequestError::Query(QueryError::LimitTooHigh { limit: 101, max: 100 }))
    ));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ErrorBody::from(err).error_code, "LIMIT_TOO_HIGH");

    let err = managers
        .hotels
        .find_mine("user-1", &raw(json!({"sort": {"createdAt": "up"}})))
        .await
        .unwrap_err();
    let body = ErrorBody::from(err);
    assert_eq!(body.error_code, "SORTING_NOT_VALID");
    assert_eq!(body.status_code, 400);

    let err = managers.hotels.find_by_slug("missing").await.unwrap_err();
    let body = ErrorBody::from(err);
    assert_eq!(body.error_code, "HOTEL_NOT_FOUND");
    assert_eq!(body.status_code, 404);
}

#[tokio::test]
async fn published_only() {
    let hotels = managers(30)
        .hotels
        .filter_hotels(&HotelFilterCriteria::default())
        .await
        .unwrap();
    assert_eq!(hotels.len(), 27);
    assert!(hotels.iter().all(|hotel| hotel.is_published));
}

#[tokio::test]
async fn nearest_first() {
    let hotels = managers(10)
        .hotels
        .filter_hotels(&criteria(json!({
            "coordinates": ["27.14", "38.42"],
            "maxDistance": "5",
        })))
        .await
        .unwrap();
    let ids: Vec<_> = hotels.iter().map(|hotel| hotel.id.as_str()).collect();
    assert_eq!(ids, ["hotel-001", "hotel-002"]);
}

#[tokio::test]
async fn price_in_currency() {
    let managers = managers(30);
    let try_hotels = managers
        .hotels
        .filter_hotels(&criteria(json!({"currency": "TRY", "minPrice": 1000, "maxPrice": 1000})))
        .await
        .unwrap();
    let ids: Vec<_> = try_hotels.iter().map(|hotel| hotel.id.as_str()).collect();
    assert_eq!(ids, ["hotel-001", "hotel-017"]);

    let usd_hotels = managers
        .hotels
        .filter_hotels(&criteria(json!({"currency": "USD", "minPrice": 1000})))
        .await
        .unwrap();
    assert!(usd_hotels.is_empty());

    let cheap = managers
        .hotels
        .filter_hotels(&criteria(json!({"currency": "USD", "maxPrice": "30"})))
        .await
        .unwrap();
    assert!(!cheap.is_empty());
    assert!(cheap.iter().all(|hotel| hotel.price_in("USD").is_some_and(|amount| amount <= 30.0)));
}

#[tokio::test]
async fn combined_criteria() {
    let hotels = managers(30)
        .hotels
        .filter_hotels(&criteria(json!({
            "search": "körfez",
            "featureIds": "feature-3",
            "listingType": "sale",
            "heatingType": "yerden",
        })))
        .await
        .unwrap();
    let ids: Vec<_> = hotels.iter().map(|hotel| hotel.id.as_str()).collect();
    assert_eq!(ids, ["hotel-003", "hotel-015", "hotel-027"]);
    for hotel in &hotels {
        assert!(hotel.title["tr"].contains("Körfez"));
        assert_eq!(hotel.feature_ids.len(), 3);
        assert_eq!(
            hotel.listing_type.as_ref().map(|listing| listing["en"].as_str()),
            Some("For Sale")
        );
        assert_eq!(
            hotel.heating_type.as_ref().map(|heating| heating["tr"].as_str()),
            Some("Yerden Isıtma")
        );
    }
}
