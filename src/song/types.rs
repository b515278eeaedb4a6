use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An artist reference as embedded in song payloads
/// (`writer_artists`, `featured_artists`, `primary_artist`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCredit {
    pub name: String,
    pub id: u64,
    pub url: String,
}

impl ArtistCredit {
    /// Parse every well-formed credit out of a JSON array.
    /// Entries missing `name`, `id` or `url` are skipped.
    pub(crate) fn list_from(value: &Value) -> Vec<ArtistCredit> {
        let Some(entries) = value.as_array() else {
            tracing::warn!("Expected an array of artist credits, got: {}", value);
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| match ArtistCredit::deserialize(entry) {
                Ok(credit) => Some(credit),
                Err(e) => {
                    tracing::debug!("Skipping malformed artist credit: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// A provider link from the `media` array
#[derive(Debug, Deserialize)]
pub(crate) struct MediaLink {
    pub provider: String,
    pub url: String,
}
