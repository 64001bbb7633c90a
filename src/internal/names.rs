use std::collections::HashMap;

use crate::internal::data_types::{ConnectionId, ConnectionInfo};

/// used when the engine can't tell us who is speaking
pub const FALLBACK_NAME: &str = "Guest";

/// connection id -> display name
/// names are derived lazily and live as long as the cache. connections don't change identity
#[derive(Debug, Default)]
pub struct NameCache {
    names: HashMap<ConnectionId, String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// returns the cached name for the connection, deriving and caching it on first sight
    pub fn resolve(&mut self, connection: Option<&ConnectionInfo>) -> String {
        let connection = match connection {
            Some(c) => c,
            None => return FALLBACK_NAME.into(),
        };
        self.names
            .entry(connection.connection_id.clone())
            .or_insert_with(|| {
                let name = Self::derive(connection);
                log::debug!(
                    "derived name {} for connection {}",
                    &name,
                    &connection.connection_id
                );
                name
            })
            .clone()
    }

    /// overrides the label for a connection, e.g. after the participant announced a name
    pub fn set(&mut self, connection_id: &str, name: String) {
        if let Some(old) = self.names.insert(connection_id.into(), name) {
            log::debug!("replacing name {} for connection {}", old, connection_id);
        }
    }

    #[cfg(test)]
    pub fn get(&self, connection_id: &str) -> Option<&str> {
        self.names.get(connection_id).map(String::as_str)
    }

    /// "Guest" followed by the five digits preceding the last digit of the creation time
    pub fn derive(connection: &ConnectionInfo) -> String {
        let creation_time = match connection.creation_time {
            Some(t) => t.to_string(),
            None => return FALLBACK_NAME.into(),
        };
        // the string is all ascii digits so byte indexing is safe
        let end = creation_time.len().saturating_sub(1);
        let start = creation_time.len().saturating_sub(6).min(end);
        format!("{}{}", FALLBACK_NAME, &creation_time[start..end])
    }
}
