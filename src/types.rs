use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Cookie carrying the encoded snapshot.
pub const PAYLOAD_COOKIE: &str = "QDC_PREFS";

/// Cookie carrying the cache-partition key.
pub const KEY_COOKIE: &str = "QDC_PREFS_KEY";

/// Cookie carrying the wire format version.
pub const VERSION_COOKIE: &str = "QDC_PREFS_VER";

/// Wire format version written by this crate and the only one it reads.
///
/// Version 1: base64url (no padding) of canonical JSON, keyed by cyrb53.
pub const SCHEMA_VERSION: &str = "1";

/// Upper bound, in characters, for encoded payloads and decoded text.
pub const MAX_ENCODED_LENGTH: usize = 4096;

/// A top-level preference group that server rendering depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceGroup {
    Translations,
    Tafsirs,
    QuranReaderStyles,
    Reading,
    Audio,
    UserHasCustomised,
}

impl PreferenceGroup {
    /// Every recognized group, in declaration order.
    pub const ALL: [PreferenceGroup; 6] = [
        PreferenceGroup::Translations,
        PreferenceGroup::Tafsirs,
        PreferenceGroup::QuranReaderStyles,
        PreferenceGroup::Reading,
        PreferenceGroup::Audio,
        PreferenceGroup::UserHasCustomised,
    ];

    /// Name used for this group on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceGroup::Translations => "translations",
            PreferenceGroup::Tafsirs => "tafsirs",
            PreferenceGroup::QuranReaderStyles => "quranReaderStyles",
            PreferenceGroup::Reading => "reading",
            PreferenceGroup::Audio => "audio",
            PreferenceGroup::UserHasCustomised => "userHasCustomised",
        }
    }

    /// Look up a group by its wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.as_str() == name)
    }
}

/// Recognized preference groups mapped to arbitrary JSON settings.
///
/// Keys are [`PreferenceGroup`]s, so a snapshot can never carry a group
/// that readers would drop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceSnapshot {
    groups: BTreeMap<PreferenceGroup, Value>,
}

impl PreferenceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a group, returning the previous value.
    pub fn insert(&mut self, group: PreferenceGroup, value: Value) -> Option<Value> {
        self.groups.insert(group, value)
    }

    /// Set a group from an optional value. `None` leaves the group absent.
    pub fn set(&mut self, group: PreferenceGroup, value: Option<Value>) {
        match value {
            Some(value) => {
                self.groups.insert(group, value);
            }
            None => {
                self.groups.remove(&group);
            }
        }
    }

    pub fn get(&self, group: PreferenceGroup) -> Option<&Value> {
        self.groups.get(&group)
    }

    pub fn remove(&mut self, group: PreferenceGroup) -> Option<Value> {
        self.groups.remove(&group)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PreferenceGroup, &Value)> {
        self.groups.iter().map(|(group, value)| (*group, value))
    }

    /// JSON object keyed by wire group names.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .groups
            .iter()
            .map(|(group, value)| (group.as_str().to_string(), value.clone()))
            .collect();
        Value::Object(map)
    }
}

impl FromIterator<(PreferenceGroup, Value)> for PreferenceSnapshot {
    fn from_iter<I: IntoIterator<Item = (PreferenceGroup, Value)>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

impl Serialize for PreferenceSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (group, value) in &self.groups {
            map.serialize_entry(group.as_str(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_match_serde_names() {
        for group in PreferenceGroup::ALL {
            let serialized = serde_json::to_value(group).unwrap();
            assert_eq!(serialized, json!(group.as_str()));
        }
    }

    #[test]
    fn from_name_round_trips() {
        for group in PreferenceGroup::ALL {
            assert_eq!(PreferenceGroup::from_name(group.as_str()), Some(group));
        }
        assert_eq!(PreferenceGroup::from_name("theme"), None);
        assert_eq!(PreferenceGroup::from_name("Translations"), None);
    }

    #[test]
    fn set_none_removes_group() {
        let mut snapshot = PreferenceSnapshot::new();
        snapshot.set(PreferenceGroup::Audio, Some(json!({ "reciter": 7 })));
        assert_eq!(snapshot.len(), 1);
        snapshot.set(PreferenceGroup::Audio, None);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn to_value_uses_wire_names() {
        let snapshot: PreferenceSnapshot = [
            (
                PreferenceGroup::QuranReaderStyles,
                json!({ "quranFont": "code_v2" }),
            ),
            (PreferenceGroup::UserHasCustomised, json!(true)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            snapshot.to_value(),
            json!({
                "quranReaderStyles": { "quranFont": "code_v2" },
                "userHasCustomised": true,
            })
        );
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            snapshot.to_value()
        );
    }
}
