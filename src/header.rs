//! `Cookie` header parsing and `Set-Cookie` rendering.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// Default lifetime of preference cookies.
const DEFAULT_MAX_AGE_DAYS: i64 = 365;

// ============================================================================
// CookieOptions
// ============================================================================

/// Attributes shared by every cookie in a preference triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    /// Absolute expiry, rendered as an HTTP-date.
    pub expires: DateTime<Utc>,
    /// Whether to add the `Secure` attribute.
    #[serde(default)]
    pub secure: bool,
}

impl CookieOptions {
    pub fn new(expires: DateTime<Utc>) -> Self {
        Self {
            expires,
            secure: false,
        }
    }

    /// Options expiring `max_age` from now.
    pub fn expiring_in(max_age: Duration) -> Self {
        Self::new(Utc::now() + max_age)
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self::expiring_in(Duration::days(DEFAULT_MAX_AGE_DAYS))
    }
}

// ============================================================================
// CookieEntry
// ============================================================================

/// One cookie to set. `Display` renders the `Set-Cookie` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieEntry {
    pub name: &'static str,
    pub value: String,
    pub expires: DateTime<Utc>,
    pub secure: bool,
}

impl CookieEntry {
    pub(crate) fn new(name: &'static str, value: String, options: &CookieOptions) -> Self {
        Self {
            name,
            value,
            expires: options.expires,
            secure: options.secure,
        }
    }

    /// Attribute string: `Path=/; Expires=<HTTP-date>; SameSite=Lax[; Secure]`.
    pub fn attributes(&self) -> String {
        let mut attrs = format!(
            "Path=/; Expires={}; SameSite=Lax",
            format_http_date(self.expires)
        );
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }
}

impl fmt::Display for CookieEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; {}", self.name, self.value, self.attributes())
    }
}

/// Render a timestamp as an IMF-fixdate, e.g. `Thu, 01 Jan 1970 00:00:00 GMT`.
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

// ============================================================================
// Cookie header parsing
// ============================================================================

/// Parse a `Cookie` request header into a name → value map.
///
/// Permissive: pairs without `=` or with an empty name are skipped, the
/// first occurrence of a name wins, one layer of double quotes is removed,
/// and values containing `%` are percent-decoded when that yields UTF-8.
/// Malformed input produces fewer entries, never an error.
pub fn parse_cookie_header(header: &str) -> BTreeMap<String, String> {
    let mut cookies: BTreeMap<String, String> = BTreeMap::new();

    for pair in header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || cookies.contains_key(name) {
            continue;
        }

        let mut value = value.trim();
        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            value = &value[1..value.len() - 1];
        }

        cookies.insert(name.to_string(), decode_value(value));
    }

    cookies
}

fn decode_value(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn formats_http_date() {
        assert_eq!(format_http_date(at(0)), "Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(
            format_http_date(at(1_784_160_000)),
            "Thu, 16 Jul 2026 00:00:00 GMT"
        );
    }

    #[test]
    fn renders_set_cookie() {
        let entry = CookieEntry::new("QDC_PREFS_VER", "1".to_string(), &CookieOptions::new(at(0)));
        assert_eq!(
            entry.to_string(),
            "QDC_PREFS_VER=1; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; SameSite=Lax"
        );
    }

    #[test]
    fn renders_secure_attribute() {
        let options = CookieOptions::new(at(0)).with_secure(true);
        let entry = CookieEntry::new("QDC_PREFS_KEY", "abc".to_string(), &options);
        assert!(entry.attributes().ends_with("; SameSite=Lax; Secure"));
    }

    #[test]
    fn default_options_expire_in_the_future() {
        let options = CookieOptions::default();
        assert!(options.expires > Utc::now() + Duration::days(364));
        assert!(!options.secure);
    }

    #[test]
    fn options_deserialize_with_default_secure() {
        let options: CookieOptions =
            serde_json::from_str(r#"{"expires":"1970-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(options, CookieOptions::new(at(0)));
    }

    #[test]
    fn parses_simple_header() {
        let cookies = parse_cookie_header("a=1; b=two;c=3");
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies["a"], "1");
        assert_eq!(cookies["b"], "two");
        assert_eq!(cookies["c"], "3");
    }

    #[test]
    fn first_occurrence_wins() {
        let cookies = parse_cookie_header("a=1; a=2");
        assert_eq!(cookies["a"], "1");
    }

    #[test]
    fn splits_at_first_equals() {
        let cookies = parse_cookie_header("token=abc==; next=x=y");
        assert_eq!(cookies["token"], "abc==");
        assert_eq!(cookies["next"], "x=y");
    }

    #[test]
    fn strips_quotes_and_decodes() {
        let cookies = parse_cookie_header(r#"q="quoted"; p=a%20b; bad=%FF%FE; lone=""#);
        assert_eq!(cookies["q"], "quoted");
        assert_eq!(cookies["p"], "a b");
        assert_eq!(cookies["bad"], "%FF%FE");
        assert_eq!(cookies["lone"], "\"");
    }

    #[test]
    fn skips_malformed_pairs() {
        let cookies = parse_cookie_header(";;novalue; =orphan;  ok = yes ;");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies["ok"], "yes");
    }

    #[test]
    fn empty_header_yields_empty_map() {
        assert!(parse_cookie_header("").is_empty());
        assert!(parse_cookie_header("   ").is_empty());
    }
}
