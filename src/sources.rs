//! Configured sources as supplied by the entity layer
//!
//! A `ConfiguredSource` is one entry of the per-renderer source list served
//! by the external entity/configuration layer (the same records the gateway
//! exposes in its services JSON). This core treats the list as read-only
//! input; it resolves display names against the catalog and derives the
//! capability-filtered views shown in the picker.

use serde::{Deserialize, Serialize};

use crate::catalog;

/// Placeholder display name for sources with no name and no catalog entry.
pub const UNNAMED: &str = "unnamed";

/// One addressable input on a renderer, as configured upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredSource {
    /// Protocol address (`family:code`, optionally sub-unit or `+component`)
    pub id: String,
    /// Resource path of the renderer this source belongs to
    #[serde(default)]
    pub resource: String,
    /// Destination class: 1 = video path, 254 = tape/memory path, else audio
    #[serde(default)]
    pub destination_class: i64,
    /// Whether the source is the locally-attached default signal
    #[serde(default)]
    pub is_link_default: bool,
    /// Unit id targeted by BeoRemote One generation commands
    #[serde(default)]
    pub auto_unit: Option<String>,
    /// Explicit display name; falls back to the catalog label when empty
    #[serde(default)]
    pub name: Option<String>,
    /// Hidden sources are excluded from filtered views but stay addressable
    #[serde(default)]
    pub hidden: bool,
    /// Ordered `"<command>?key=value&..."` entries run on selection
    #[serde(default)]
    pub selection_commands: Vec<String>,
}

impl ConfiguredSource {
    /// Display name: explicit name, else catalog label, else a placeholder.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            if !name.is_empty() {
                return name.clone();
            }
        }
        match catalog::lookup(&self.id) {
            Some(def) => def.label.to_string(),
            None => UNNAMED.to_string(),
        }
    }
}

/// Capability views a source list can be filtered down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Video,
    Audio,
}

/// Filter a source list down to one capability view.
///
/// Stable: input order is preserved. Hidden sources are always excluded.
/// Sources with no catalog entry pass every view — unknown addresses must
/// still be selectable, just without capability information.
pub fn filter_sources(sources: &[ConfiguredSource], capability: Capability) -> Vec<ConfiguredSource> {
    sources
        .iter()
        .filter(|source| !source.hidden)
        .filter(|source| match catalog::lookup(&source.id) {
            Some(def) => match capability {
                Capability::Video => def.video,
                Capability::Audio => def.audio,
            },
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str) -> ConfiguredSource {
        ConfiguredSource {
            id: id.to_string(),
            resource: "renderer/living".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn display_name_prefers_explicit_name() {
        let mut s = source("F0:128");
        s.name = Some("Living Room TV".to_string());
        assert_eq!(s.display_name(), "Living Room TV");
    }

    #[test]
    fn display_name_falls_back_to_catalog_label() {
        let mut s = source("F0:128");
        assert_eq!(s.display_name(), "TV");
        // Empty string counts as no name
        s.name = Some(String::new());
        assert_eq!(s.display_name(), "TV");
    }

    #[test]
    fn display_name_placeholder_for_unknown_id() {
        assert_eq!(source("F9:200").display_name(), UNNAMED);
    }

    #[test]
    fn hidden_sources_never_pass_either_view() {
        let mut hidden = source("F0:128");
        hidden.hidden = true;
        let sources = vec![hidden, source("F0:146")];
        assert!(filter_sources(&sources, Capability::Video).is_empty());
        let audio = filter_sources(&sources, Capability::Audio);
        assert_eq!(audio.len(), 1);
        assert_eq!(audio[0].id, "F0:146");
    }

    #[test]
    fn filter_respects_catalog_flags_and_order() {
        let sources = vec![
            source("F0:146"), // audio
            source("F0:128"), // video
            source("F0:141"), // WEBMEDIA, both
            source("F0:148"), // audio
        ];
        let video: Vec<_> = filter_sources(&sources, Capability::Video)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(video, vec!["F0:128", "F0:141"]);
        let audio: Vec<_> = filter_sources(&sources, Capability::Audio)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(audio, vec!["F0:146", "F0:141", "F0:148"]);
    }

    #[test]
    fn unknown_sources_appear_in_both_views() {
        let sources = vec![source("CUSTOM:1")];
        assert_eq!(filter_sources(&sources, Capability::Video).len(), 1);
        assert_eq!(filter_sources(&sources, Capability::Audio).len(), 1);
    }

    #[test]
    fn deserializes_entity_layer_record() {
        let json = serde_json::json!({
            "id": "F0:138+4",
            "resource": "renderer/living",
            "destinationClass": 1,
            "isLinkDefault": true,
            "autoUnit": "Tv1",
            "hidden": false,
            "selectionCommands": ["Beo4 command?Command=DTV"]
        });
        let s: ConfiguredSource = serde_json::from_value(json).unwrap();
        assert_eq!(s.id, "F0:138+4");
        assert_eq!(s.destination_class, 1);
        assert!(s.is_link_default);
        assert_eq!(s.auto_unit.as_deref(), Some("Tv1"));
        assert_eq!(s.selection_commands.len(), 1);
    }
}
