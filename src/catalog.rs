use crate::types::SourceId;
use serde_json::Value;
use std::collections::BTreeMap;

/// Bidirectional map between source identifiers and display names
///
/// Built from the device's input list and its preset list. Each identifier
/// maps to exactly one display name and each display name to exactly one
/// identifier; inserting a pair that collides on either side evicts the
/// older pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCatalog {
    names: BTreeMap<SourceId, String>,
    ids: BTreeMap<String, SourceId>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from the `data` objects of `system/sources` and `presets/list`
    pub fn from_json(sources: &Value, presets: &Value) -> Self {
        let mut catalog = Self::new();
        catalog.extend_from_list(sources.get("sources"));
        catalog.extend_from_list(presets.get("presets"));
        catalog
    }

    fn extend_from_list(&mut self, list: Option<&Value>) {
        let Some(entries) = list.and_then(|v| v.as_array()) else {
            return;
        };

        for entry in entries {
            let id = entry.get("id").and_then(source_id_from_json);
            let name = entry.get("name").and_then(|v| v.as_str());
            match (id, name) {
                (Some(id), Some(name)) => {
                    tracing::debug!("Catalog entry {} => {}", id, name);
                    self.insert(id, name);
                }
                _ => tracing::warn!("Skipping catalog entry without id or name: {}", entry),
            }
        }
    }

    /// Insert an id/name pair, evicting any pair that shares either side.
    ///
    /// Returns the evicted `(id, name)` pairs, excluding an exact re-insert.
    pub fn insert(
        &mut self,
        id: impl Into<SourceId>,
        name: impl Into<String>,
    ) -> Vec<(SourceId, String)> {
        let id = id.into();
        let name = name.into();
        let mut evicted = Vec::new();

        if let Some(old_name) = self.names.remove(&id) {
            self.ids.remove(&old_name);
            evicted.push((id.clone(), old_name));
        }
        if let Some(old_id) = self.ids.remove(&name) {
            self.names.remove(&old_id);
            evicted.push((old_id, name.clone()));
        }
        evicted.retain(|(old_id, old_name)| *old_id != id || *old_name != name);

        for (old_id, old_name) in &evicted {
            tracing::warn!(
                "Source {} ({}) replaced by {} ({})",
                old_id,
                old_name,
                id,
                name
            );
        }

        self.names.insert(id.clone(), name.clone());
        self.ids.insert(name, id);
        evicted
    }

    /// Display name for a source identifier
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Source identifier for a display name
    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    /// All display names, sorted
    pub fn names(&self) -> Vec<String> {
        // `ids` is keyed by name, so its keys are already ordered
        self.ids.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(id, name)` pairs ordered by id
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }
}

/// Preset ids are numeric on the wire; inputs are strings.
fn source_id_from_json(value: &Value) -> Option<SourceId> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Lifecycle of the catalog on a device
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    /// Not fetched yet
    #[default]
    Uninitialized,
    /// Fetched; never invalidated unless rebuilt explicitly
    Ready(SourceCatalog),
}

impl CatalogState {
    pub fn is_ready(&self) -> bool {
        matches!(self, CatalogState::Ready(_))
    }

    pub fn catalog(&self) -> Option<&SourceCatalog> {
        match self {
            CatalogState::Ready(catalog) => Some(catalog),
            CatalogState::Uninitialized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_bidirectional(catalog: &SourceCatalog) {
        for (id, name) in catalog.iter() {
            assert_eq!(catalog.id_of(name), Some(id));
        }
        for name in catalog.names() {
            let id = catalog.id_of(&name).unwrap();
            assert_eq!(catalog.name_of(id), Some(name.as_str()));
        }
        assert_eq!(catalog.names().len(), catalog.len());
    }

    #[test]
    fn builds_from_sources_and_presets() {
        let sources = json!({
            "sources": [
                {"id": "USB_AUDIO", "name": "USB Audio"},
                {"id": "SPOTIFY", "name": "Spotify"}
            ]
        });
        let presets = json!({
            "presets": [
                {"id": 3, "name": "My Preset 3", "is_playing": false},
                {"id": 7, "name": "Radio Paradise", "is_playing": true}
            ]
        });

        let catalog = SourceCatalog::from_json(&sources, &presets);

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.name_of("USB_AUDIO"), Some("USB Audio"));
        assert_eq!(catalog.id_of("My Preset 3"), Some("3"));
        assert_eq!(catalog.name_of("7"), Some("Radio Paradise"));
        assert_eq!(
            catalog.names(),
            vec!["My Preset 3", "Radio Paradise", "Spotify", "USB Audio"]
        );
        assert_bidirectional(&catalog);
    }

    #[test]
    fn missing_lists_and_bad_entries_are_skipped() {
        let sources = json!({
            "sources": [
                {"id": "CAST"},
                {"name": "Orphan"},
                {"id": true, "name": "Bool id"},
                {"id": "CAST", "name": "Chromecast"}
            ]
        });
        let catalog = SourceCatalog::from_json(&sources, &json!({}));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.name_of("CAST"), Some("Chromecast"));
        assert!(SourceCatalog::from_json(&Value::Null, &Value::Null).is_empty());
    }

    #[test]
    fn duplicate_name_evicts_previous_id() {
        let mut catalog = SourceCatalog::new();
        assert!(catalog.insert("AIRPLAY", "Lounge").is_empty());
        let evicted = catalog.insert("4", "Lounge");

        assert_eq!(evicted, vec![("AIRPLAY".to_string(), "Lounge".to_string())]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.name_of("AIRPLAY"), None);
        assert_eq!(catalog.id_of("Lounge"), Some("4"));
        assert_bidirectional(&catalog);
    }

    #[test]
    fn renaming_an_id_drops_old_name() {
        let mut catalog = SourceCatalog::new();
        catalog.insert("ROON", "Roon");
        let evicted = catalog.insert("ROON", "Roon Ready");

        assert_eq!(evicted, vec![("ROON".to_string(), "Roon".to_string())]);
        assert!(catalog.insert("ROON", "Roon Ready").is_empty());

        assert_eq!(catalog.id_of("Roon"), None);
        assert_eq!(catalog.id_of("Roon Ready"), Some("ROON"));
        assert_bidirectional(&catalog);
    }

    #[test]
    fn preset_sharing_an_input_name_replaces_the_input() {
        let sources = json!({"sources": [{"id": "SPOTIFY", "name": "Spotify"}]});
        let presets = json!({"presets": [{"id": 2, "name": "Spotify", "is_playing": false}]});

        let catalog = SourceCatalog::from_json(&sources, &presets);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.name_of("SPOTIFY"), None);
        assert_eq!(catalog.id_of("Spotify"), Some("2"));
        assert_bidirectional(&catalog);
    }

    #[test]
    fn lifecycle_starts_uninitialized() {
        let state = CatalogState::default();
        assert!(!state.is_ready());
        assert!(state.catalog().is_none());

        let state = CatalogState::Ready(SourceCatalog::new());
        assert!(state.is_ready());
    }
}
