pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod view;

pub use client::{
    fallback_clients, is_valid_for_marker, normalize_client, normalize_clients_payload,
    ClientRecord, Coordinates, Location, Normalizer,
};
pub use config::{load_config, Config};
pub use error::{Result, TrackerError};
pub use fetch::{load_clients, ClientFetcher, ClientSource, LoadedClients};
