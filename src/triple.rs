//! The payload / key / version cookie triple.
//!
//! Write path: snapshot → canonical text → payload + cache key → three
//! cookies with shared attributes. Read path: `Cookie` header → version gate
//! → payload decode → group allowlist, with the key validated on its own.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::allowlist::try_filter_groups;
use crate::canonical::canonical_text;
use crate::codec::{try_decode_payload, try_encode_payload};
use crate::error::SnapshotError;
use crate::hash::cache_key;
use crate::header::{parse_cookie_header, CookieEntry, CookieOptions};
use crate::types::{
    PreferenceSnapshot, KEY_COOKIE, PAYLOAD_COOKIE, SCHEMA_VERSION, VERSION_COOKIE,
};

static KEY_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]+$").expect("valid key pattern"));

// ============================================================================
// Types
// ============================================================================

/// Cookies produced for one response, plus the key they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceCookies {
    /// Payload, key, and version cookies, in that order.
    ///
    /// `None` when the snapshot is too large to persist. The three cookies
    /// are always produced together or not at all.
    pub entries: Option<[CookieEntry; 3]>,
    /// Cache-partition key, also carried by the key cookie.
    pub key: String,
}

impl PreferenceCookies {
    /// `Set-Cookie` header values for all three entries, or none.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.entries
            .iter()
            .flatten()
            .map(ToString::to_string)
            .collect()
    }
}

/// What a request's cookies say about its preferences.
///
/// The two fields are independent: a valid snapshot may arrive with no
/// usable key, and a usable key may arrive with an undecodable payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceRead {
    pub preferences: Option<PreferenceSnapshot>,
    pub key: Option<String>,
}

// ============================================================================
// Write path
// ============================================================================

/// Build the cookie triple for a snapshot.
///
/// The key is always computed. If the encoded snapshot would exceed the
/// size bound, `entries` is `None` and no cookie at all should be written.
pub fn build_preference_cookies(
    snapshot: &PreferenceSnapshot,
    options: &CookieOptions,
) -> PreferenceCookies {
    let text = canonical_text(&snapshot.to_value());
    let key = cache_key(&text);

    let entries = match try_encode_payload(&text) {
        Ok(payload) => Some([
            CookieEntry::new(PAYLOAD_COOKIE, payload, options),
            CookieEntry::new(KEY_COOKIE, key.clone(), options),
            CookieEntry::new(VERSION_COOKIE, SCHEMA_VERSION.to_string(), options),
        ]),
        Err(e) => {
            warn!(groups = snapshot.len(), "preference cookies not built: {e}");
            None
        }
    };

    PreferenceCookies { entries, key }
}

/// Cache-partition key a build of `snapshot` would carry.
pub fn snapshot_cache_key(snapshot: &PreferenceSnapshot) -> String {
    cache_key(&canonical_text(&snapshot.to_value()))
}

/// Expired, empty overwrites for all three cookies.
pub fn clear_preference_cookies(secure: bool) -> [CookieEntry; 3] {
    let options = CookieOptions::new(DateTime::<Utc>::UNIX_EPOCH).with_secure(secure);
    [PAYLOAD_COOKIE, KEY_COOKIE, VERSION_COOKIE]
        .map(|name| CookieEntry::new(name, String::new(), &options))
}

// ============================================================================
// Read path
// ============================================================================

/// Read preferences and cache key from a raw `Cookie` header.
///
/// A missing or malformed header reads as "nothing known".
pub fn read_preference_cookies(header: Option<&str>) -> PreferenceRead {
    match header {
        Some(header) => read_preference_cookie_map(&parse_cookie_header(header)),
        None => PreferenceRead::default(),
    }
}

/// Read preferences and cache key from already-parsed cookies.
pub fn read_preference_cookie_map(cookies: &BTreeMap<String, String>) -> PreferenceRead {
    if let Err(e) = check_version(cookies.get(VERSION_COOKIE).map(String::as_str)) {
        debug!("preference cookies ignored: {e}");
        return PreferenceRead::default();
    }

    let preferences = cookies.get(PAYLOAD_COOKIE).and_then(|payload| {
        read_payload(payload)
            .map_err(|e| debug!("preference payload ignored: {e}"))
            .ok()
    });

    let key = cookies.get(KEY_COOKIE).and_then(|key| {
        check_key(key)
            .map_err(|e| debug!("preference key ignored: {e}"))
            .ok()
    });

    PreferenceRead { preferences, key }
}

/// An absent version cookie is accepted; a different one is not.
fn check_version(version: Option<&str>) -> Result<(), SnapshotError> {
    match version {
        Some(got) if got != SCHEMA_VERSION => Err(SnapshotError::UnsupportedSchemaVersion {
            got: got.to_string(),
            supported: SCHEMA_VERSION,
        }),
        _ => Ok(()),
    }
}

fn read_payload(payload: &str) -> Result<PreferenceSnapshot, SnapshotError> {
    let text = try_decode_payload(payload)?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| SnapshotError::MalformedStructure(e.to_string()))?;
    try_filter_groups(&value)
}

fn check_key(key: &str) -> Result<String, SnapshotError> {
    if KEY_FORMAT.is_match(key) {
        Ok(key.to_string())
    } else {
        Err(SnapshotError::InvalidKeyFormat)
    }
}
