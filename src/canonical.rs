//! Canonical JSON text for preference snapshots.
//!
//! Object keys are sorted at every depth (UTF-16 code-unit order, matching
//! JavaScript's default sort); array order is preserved. Two values that are
//! equal as JSON therefore produce byte-identical text.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SnapshotError;

/// Rebuild a value with every object's keys in canonical order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key.clone(), canonicalize(value)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        scalar => scalar.clone(),
    }
}

/// Canonical text of a JSON value.
pub fn canonical_text(value: &Value) -> String {
    canonicalize(value).to_string()
}

/// Canonical text of any serializable value.
///
/// `Option::None` fields marked `skip_serializing_if` are omitted, so typed
/// settings with missing optional fields canonicalize the same as objects
/// that never had the key.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, SnapshotError> {
    Ok(canonical_text(&serde_json::to_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_at_every_depth() {
        let value = json!({
            "b": { "z": 1, "a": 2 },
            "a": [ { "y": true, "x": null } ],
        });
        assert_eq!(
            canonical_text(&value),
            r#"{"a":[{"x":null,"y":true}],"b":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let first = json!({ "reading": { "mode": "translation", "font": 3 }, "audio": 1 });
        let second = json!({ "audio": 1, "reading": { "font": 3, "mode": "translation" } });
        assert_eq!(canonical_text(&first), canonical_text(&second));
    }

    #[test]
    fn array_order_is_preserved() {
        assert_ne!(
            canonical_text(&json!([1, 2])),
            canonical_text(&json!([2, 1]))
        );
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(canonical_text(&json!("x")), r#""x""#);
        assert_eq!(canonical_text(&json!(131)), "131");
        assert_eq!(canonical_text(&Value::Null), "null");
    }

    #[test]
    fn sorts_by_utf16_code_units() {
        // U+1F600 sorts after U+FF21 by code point but before it in UTF-16.
        let value = json!({ "\u{FF21}": 2, "\u{1F600}": 1 });
        assert_eq!(canonical_text(&value), "{\"\u{1F600}\":1,\"\u{FF21}\":2}");
    }

    #[test]
    fn skipped_options_are_omitted() {
        #[derive(Serialize)]
        struct Styles {
            #[serde(rename = "quranFont")]
            quran_font: String,
            #[serde(rename = "tafsirFontScale", skip_serializing_if = "Option::is_none")]
            tafsir_font_scale: Option<u8>,
        }

        let styles = Styles {
            quran_font: "code_v1".to_string(),
            tafsir_font_scale: None,
        };
        assert_eq!(
            canonical_json(&styles).unwrap(),
            r#"{"quranFont":"code_v1"}"#
        );
        assert_eq!(
            canonical_json(&styles).unwrap(),
            canonical_text(&json!({ "quranFont": "code_v1" }))
        );
    }

    #[test]
    fn rejects_non_string_map_keys() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], 1);
        assert!(matches!(canonical_json(&map), Err(SnapshotError::Json(_))));
    }
}
