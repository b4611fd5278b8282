//! Server-relevant display preferences packed into cookies.
//!
//! This crate provides the pure pipelines behind preference-aware server
//! rendering:
//! - Canonical, order-independent JSON text for a preference snapshot
//! - A size-bounded base64url codec that never fails loudly
//! - A cyrb53 fingerprint rendered as a base-36 cache-partition key
//! - Building, reading, and clearing the payload/key/version cookie triple
//!
//! Transport (reading request headers, writing `Set-Cookie`) and cache
//! storage stay with the host application.

mod allowlist;
mod canonical;
mod codec;
mod error;
mod hash;
mod header;
mod triple;
mod types;

pub use allowlist::{filter_groups, try_filter_groups};
pub use canonical::{canonical_json, canonical_text, canonicalize};
pub use codec::{decode_payload, encode_payload, try_decode_payload, try_encode_payload};
pub use error::SnapshotError;
pub use hash::{cache_key, cyrb53};
pub use header::{format_http_date, parse_cookie_header, CookieEntry, CookieOptions};
pub use triple::{
    build_preference_cookies, clear_preference_cookies, read_preference_cookie_map,
    read_preference_cookies, snapshot_cache_key, PreferenceCookies, PreferenceRead,
};
pub use types::{
    PreferenceGroup, PreferenceSnapshot, KEY_COOKIE, MAX_ENCODED_LENGTH, PAYLOAD_COOKIE,
    SCHEMA_VERSION, VERSION_COOKIE,
};
