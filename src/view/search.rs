use crate::client::ClientRecord;

/// Case-insensitive substring search over name, compressor model and
/// billing address. An empty query matches everything.
pub fn filter_clients<'a>(clients: &'a [ClientRecord], query: &str) -> Vec<&'a ClientRecord> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return clients.iter().collect();
    }

    clients
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || c.compressor_model.to_lowercase().contains(&needle)
                || c.billing_address
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fallback_clients;

    fn names(found: &[&ClientRecord]) -> Vec<String> {
        found.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn empty_query_returns_all() {
        let clients = fallback_clients();
        assert_eq!(filter_clients(&clients, "").len(), 3);
    }

    #[test]
    fn matches_model_case_insensitively() {
        let clients = fallback_clients();
        assert_eq!(names(&filter_clients(&clients, "as 7")), ["Acme Industrial"]);
    }

    #[test]
    fn matches_billing_address() {
        let clients = fallback_clients();
        assert_eq!(names(&filter_clients(&clients, "harbor")), ["Oceanic Foods"]);
    }

    #[test]
    fn does_not_search_email_or_phone() {
        let clients = fallback_clients();
        assert!(filter_clients(&clients, "pm@acme").is_empty());
        assert!(filter_clients(&clients, "555-1010").is_empty());
    }
}
