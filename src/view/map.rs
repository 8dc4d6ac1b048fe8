use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::client::{is_valid_for_marker, ClientRecord, Coordinates};

/// San Francisco, used when no client can be placed on the map.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 37.7749,
    lng: -122.4194,
};

pub const DEFAULT_ZOOM: u8 = 6;

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1";

/// Characters left alone by URI component encoding.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Clients that can be placed on the map, in input order.
pub fn markers(clients: &[ClientRecord]) -> Vec<&ClientRecord> {
    clients.iter().filter(|c| is_valid_for_marker(c)).collect()
}

/// Mean position of all mappable clients, or [`DEFAULT_CENTER`].
pub fn map_center(clients: &[ClientRecord]) -> Coordinates {
    let points: Vec<Coordinates> = clients.iter().filter_map(ClientRecord::coordinates).collect();
    if points.is_empty() {
        return DEFAULT_CENTER;
    }

    let count = points.len() as f64;
    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Coordinates {
        lat: lat_sum / count,
        lng: lng_sum / count,
    }
}

/// Driving directions deep link to a client, if it has a valid location.
pub fn directions_url(client: &ClientRecord) -> Option<String> {
    let Coordinates { lat, lng } = client.coordinates()?;
    let destination = format!("{lat},{lng}");
    Some(format!(
        "{DIRECTIONS_BASE}&destination={}&travelmode=driving",
        utf8_percent_encode(&destination, URI_COMPONENT)
    ))
}

/// Everything a map widget needs to draw the client list.
#[derive(Debug, Serialize)]
pub struct MapView<'a> {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<&'a ClientRecord>,
}

impl<'a> MapView<'a> {
    pub fn new(clients: &'a [ClientRecord], zoom: u8) -> Self {
        Self {
            center: map_center(clients),
            zoom,
            markers: markers(clients),
        }
    }
}

#[cfg(test)]
#[path = "map_test.rs"]
mod tests;
