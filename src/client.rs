//! Client identifier derivation for rate limiting.

use std::collections::{BTreeMap, HashMap};

/// Returned when no address header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Headers consulted in priority order.
pub const CLIENT_ADDRESS_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Case-insensitive read access to request headers.
pub trait HeaderLookup {
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderLookup for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl HeaderLookup for BTreeMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl HeaderLookup for [(&str, &str)] {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

/// Derive the rate-limit key for a request.
///
/// Uses the first entry of `x-forwarded-for`, then `x-real-ip`, then
/// `cf-connecting-ip`, then the literal `"unknown"`. Empty values are skipped.
pub fn client_identifier<H: HeaderLookup + ?Sized>(headers: &H) -> String {
    CLIENT_ADDRESS_HEADERS
        .iter()
        .filter_map(|name| headers.header(name))
        .map(|value| value.split(',').next().unwrap_or("").trim())
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
