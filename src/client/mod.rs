mod fallback;
mod ids;
mod normalize;

pub use fallback::fallback_clients;
pub use ids::{IdGenerator, RandomIds};
pub use normalize::{
    coerce_to_number, coerce_to_string, is_truthy, is_valid_for_marker, is_valid_marker_value,
    normalize_client, normalize_clients_payload, Normalizer, UNKNOWN_CLIENT, UNKNOWN_MODEL,
};

use serde::{Deserialize, Serialize};

/// A finite latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Where a client sits on the map, if known.
///
/// Serializes as `{"lat": .., "lng": ..}` where both values are numbers or
/// both are `null`. A partial pair can't be represented: any non-finite or
/// missing coordinate collapses the whole location to unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "LocationFields", into = "LocationFields")]
pub struct Location(Option<Coordinates>);

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        if lat.is_finite() && lng.is_finite() {
            Self(Some(Coordinates { lat, lng }))
        } else {
            Self(None)
        }
    }

    pub fn unknown() -> Self {
        Self(None)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.0
    }

    pub fn lat(&self) -> Option<f64> {
        self.0.map(|c| c.lat)
    }

    pub fn lng(&self) -> Option<f64> {
        self.0.map(|c| c.lng)
    }
}

#[derive(Serialize, Deserialize)]
struct LocationFields {
    lat: Option<f64>,
    lng: Option<f64>,
}

impl From<LocationFields> for Location {
    fn from(fields: LocationFields) -> Self {
        match (fields.lat, fields.lng) {
            (Some(lat), Some(lng)) => Location::new(lat, lng),
            _ => Location::unknown(),
        }
    }
}

impl From<Location> for LocationFields {
    fn from(location: Location) -> Self {
        LocationFields {
            lat: location.lat(),
            lng: location.lng(),
        }
    }
}

/// Canonical client account record, as produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub billing_address: Option<String>,
    pub compressor_model: String,
    pub next_maintenance_date: Option<String>,
    #[serde(default)]
    pub location: Location,
}

impl ClientRecord {
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.location.coordinates()
    }
}
