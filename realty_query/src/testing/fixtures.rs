use realty_macros::localized;
use serde_json::json;

use crate::store::{Document, memory::MemoryDocumentStore};

pub const HOTELS: &str = "hotels";
pub const FEATURES: &str = "features";
pub const USERS: &str = "users";

const TITLES: [(&str, &str); 4] = [
    ("Deniz Manzaralı Otel", "Sea View Hotel"),
    ("Şehir Merkezi Pansiyon", "City Center Guesthouse"),
    ("İzmir Körfez Evi", "Izmir Bay House"),
    ("Çamlık Dağ Evi", "Pine Mountain Lodge"),
];

const LISTING_TYPES: [(&str, &str); 2] = [("Satılık", "For Sale"), ("Kiralık", "For Rent")];

const HEATING_TYPES: [(&str, &str); 3] = [
    ("Kombi", "Combi Boiler"),
    ("Merkezi", "Central"),
    ("Yerden Isıtma", "Underfloor"),
];

fn document(value: serde_json::Value) -> Document {
    value.as_object().cloned().unwrap_or_default()
}

/// Deterministic hotel documents, numbered from 1.
///
/// Room counts cycle through 1 to 5, every other hotel is furnished and
/// hotels are spread along a line east of Izmir, 0.05 degrees apart.
pub fn hotel_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            let (title_tr, title_en) = TITLES[i % TITLES.len()];
            let (listing_tr, listing_en) = LISTING_TYPES[i % LISTING_TYPES.len()];
            let (heating_tr, heating_en) = HEATING_TYPES[i % HEATING_TYPES.len()];
            let number = i + 1;
            let amount = 1_000 + (i * 250) % 4_000;
            document(json!({
                "_id": format!("hotel-{number:03}"),
                "no": number,
                "slug": format!("hotel-{number:03}"),
                "title": localized! {
                    tr => format!("{title_tr} {number}"),
                    en => format!("{title_en} {number}"),
                },
                "description": localized! {
                    tr => format!("{title_tr} açıklaması"),
                    en => format!("Description of {title_en}"),
                },
                "address": localized! { tr => "Alsancak, Konak", en => "Alsancak, Konak" },
                "roomCount": i % 5 + 1,
                "bathroomCount": i % 3 + 1,
                "bedRoomCount": i % 4 + 1,
                "totalSize": 60 + i * 10,
                "buildYear": 1990 + i,
                "buildingAge": 35 - i.min(35),
                "dues": {"amount": 100 * (i % 4)},
                "isFurnished": i % 2 == 0,
                "exchangeable": i % 3 == 0,
                "creditEligible": i % 4 != 0,
                "listingType": localized! { tr => listing_tr, en => listing_en },
                "heatingType": localized! { tr => heating_tr, en => heating_en },
                "price": [
                    {"amount": amount, "currency": "TRY"},
                    {"amount": amount / 40, "currency": "USD"},
                ],
                "featureIds": (0..=i % 3).map(|f| format!("feature-{}", f + 1)).collect::<Vec<_>>(),
                "location": {
                    "type": "Point",
                    "coordinates": [27.14 + i as f64 * 0.05, 38.42],
                },
                "managerId": format!("user-{}", i % 2 + 1),
                "isPublished": i % 10 != 9,
                "isConfirmedByAdmin": i % 5 != 4,
            }))
        })
        .collect()
}

pub fn feature_documents() -> Vec<Document> {
    [
        ("feature-1", "Havuz", "Pool", "outside", 2),
        ("feature-2", "Otopark", "Parking", "general", 1),
        ("feature-3", "İnternet", "Internet", "inside", 3),
    ]
    .into_iter()
    .map(|(id, tr, en, feature_type, order)| {
        document(json!({
            "_id": id,
            "name": localized! { tr => tr, en => en },
            "iconUrl": format!("/icons/{id}.svg"),
            "featureType": feature_type,
            "isQuickFilter": order < 3,
            "order": order,
        }))
    })
    .collect()
}

/// Managers of the fixture hotels.
pub fn user_documents() -> Vec<Document> {
    [
        ("user-1", "ayse@example.com", "Ayşe", "Yılmaz"),
        ("user-2", "mehmet@example.com", "Mehmet", "Işık"),
    ]
    .into_iter()
    .map(|(id, email, first_name, last_name)| {
        document(json!({
            "_id": id,
            "email": email,
            "firstName": first_name,
            "lastName": last_name,
            "password": format!("hash-of-{id}"),
            "verified": true,
            "role": "user",
        }))
    })
    .collect()
}

/// Memory store holding `count` hotels with their features and managers.
pub fn hotel_store(count: usize) -> MemoryDocumentStore {
    MemoryDocumentStore::with_data([
        (HOTELS, hotel_documents(count)),
        (FEATURES, feature_documents()),
        (USERS, user_documents()),
    ])
}
