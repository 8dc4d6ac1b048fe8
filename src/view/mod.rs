mod map;
mod search;
mod table;

pub use map::{directions_url, map_center, markers, MapView, DEFAULT_CENTER, DEFAULT_ZOOM};
pub use search::filter_clients;
pub use table::{client_table, marker_table, ClientRow, MarkerRow};
