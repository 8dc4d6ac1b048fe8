use tabled::{settings::Style, Table, Tabled};

use crate::client::ClientRecord;

const MISSING: &str = "—";
const NO_DATE: &str = "N/A";

// Table row structs for tabled
#[derive(Tabled)]
pub struct ClientRow {
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "PHONE")]
    pub phone: String,
    #[tabled(rename = "EMAIL")]
    pub email: String,
    #[tabled(rename = "BILLING ADDRESS")]
    pub billing_address: String,
    #[tabled(rename = "COMPRESSOR MODEL")]
    pub compressor_model: String,
    #[tabled(rename = "NEXT MAINTENANCE")]
    pub next_maintenance: String,
}

impl From<&ClientRecord> for ClientRow {
    fn from(client: &ClientRecord) -> Self {
        let or_missing = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());
        Self {
            name: client.name.clone(),
            phone: or_missing(&client.phone),
            email: or_missing(&client.email),
            billing_address: or_missing(&client.billing_address),
            compressor_model: client.compressor_model.clone(),
            next_maintenance: client
                .next_maintenance_date
                .clone()
                .unwrap_or_else(|| NO_DATE.to_string()),
        }
    }
}

#[derive(Tabled)]
pub struct MarkerRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "MODEL")]
    pub compressor_model: String,
    #[tabled(rename = "LAT")]
    pub lat: String,
    #[tabled(rename = "LNG")]
    pub lng: String,
}

impl From<&ClientRecord> for MarkerRow {
    fn from(client: &ClientRecord) -> Self {
        let coord = |v: Option<f64>| v.map_or_else(|| MISSING.to_string(), |x| x.to_string());
        Self {
            id: client.id.clone(),
            name: client.name.clone(),
            compressor_model: client.compressor_model.clone(),
            lat: coord(client.location.lat()),
            lng: coord(client.location.lng()),
        }
    }
}

/// List view table.
pub fn client_table(clients: &[&ClientRecord]) -> String {
    let rows: Vec<ClientRow> = clients.iter().map(|c| ClientRow::from(*c)).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Map view marker table.
pub fn marker_table(markers: &[&ClientRecord]) -> String {
    let rows: Vec<MarkerRow> = markers.iter().map(|c| MarkerRow::from(*c)).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
