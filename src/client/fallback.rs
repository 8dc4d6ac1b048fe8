use super::{ClientRecord, Location};

struct FallbackClient {
    id: &'static str,
    name: &'static str,
    phone: Option<&'static str>,
    email: Option<&'static str>,
    billing_address: &'static str,
    compressor_model: &'static str,
    next_maintenance_date: Option<&'static str>,
    lat: f64,
    lng: f64,
}

const FALLBACK_CLIENTS: [FallbackClient; 3] = [
    FallbackClient {
        id: "ACCT-0001",
        name: "Acme Industrial",
        phone: Some("555-1010"),
        email: Some("pm@acme.example"),
        billing_address: "123 Industrial Way, City A, ST",
        compressor_model: "AS 7",
        next_maintenance_date: Some("2025-10-01"),
        lat: 34.0522,
        lng: -118.2437,
    },
    FallbackClient {
        id: "ACCT-0002",
        name: "Oceanic Foods",
        phone: Some("555-2020"),
        email: Some("service@oceanic.example"),
        billing_address: "45 Harbor Dr, City B, ST",
        compressor_model: "CSD 85",
        next_maintenance_date: Some("2025-09-15"),
        lat: 37.7749,
        lng: -122.4194,
    },
    FallbackClient {
        id: "ACCT-0003",
        name: "Valley Construction",
        phone: None,
        email: None,
        billing_address: "678 Construction Rd, City C, ST",
        compressor_model: "CD 60",
        next_maintenance_date: None,
        lat: 36.7783,
        lng: -119.4179,
    },
];

/// Built-in dataset shown when live data can't be fetched or parsed.
pub fn fallback_clients() -> Vec<ClientRecord> {
    FALLBACK_CLIENTS
        .iter()
        .map(|c| ClientRecord {
            id: c.id.to_string(),
            name: c.name.to_string(),
            phone: c.phone.map(str::to_string),
            email: c.email.map(str::to_string),
            billing_address: Some(c.billing_address.to_string()),
            compressor_model: c.compressor_model.to_string(),
            next_maintenance_date: c.next_maintenance_date.map(str::to_string),
            location: Location::new(c.lat, c.lng),
        })
        .collect()
}
