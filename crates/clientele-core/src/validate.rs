// Client-side validation of the add form.
//
// Input is trimmed and HTML-escaped first, then classified. Address-like
// values are uppercased so MAC comparisons on the appliance stay
// case-insensitive.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use strum::Display;

use crate::error::CoreError;
use crate::text::escape_html;

pub const EMPTY_INPUT: &str = "Please specify a client IP or MAC address";
pub const INVALID_INPUT: &str = "Input is neither a valid IP or MAC address nor a valid host name!";

#[allow(clippy::unwrap_used)]
static MAC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$").unwrap());

/// What kind of identifier a client value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum ClientKind {
    #[strum(serialize = "IPv4")]
    Ipv4,
    #[strum(serialize = "IPv6")]
    Ipv6,
    #[strum(serialize = "MAC")]
    Mac,
    #[strum(serialize = "host name")]
    Hostname,
}

/// An accepted, normalized add-form value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedClient {
    pub value: String,
    pub kind: ClientKind,
}

/// Validate and normalize what the operator entered.
///
/// Returns [`CoreError::Validation`] with the operator-facing warning when
/// the value is empty or matches none of IPv4/CIDR, IPv6/CIDR, MAC or host
/// name.
pub fn validate_client_input(raw: &str) -> Result<ValidatedClient, CoreError> {
    let escaped = escape_html(raw.trim());
    if escaped.is_empty() {
        return Err(CoreError::validation(EMPTY_INPUT));
    }

    let kind = classify(&escaped).ok_or_else(|| CoreError::validation(INVALID_INPUT))?;
    let value = match kind {
        ClientKind::Ipv4 | ClientKind::Ipv6 | ClientKind::Mac => escaped.to_uppercase(),
        ClientKind::Hostname => escaped,
    };
    Ok(ValidatedClient { value, kind })
}

/// Classify an (already trimmed) value.
pub fn classify(value: &str) -> Option<ClientKind> {
    if is_ipv4_cidr(value) {
        Some(ClientKind::Ipv4)
    } else if is_ipv6_cidr(value) {
        Some(ClientKind::Ipv6)
    } else if is_mac(value) {
        Some(ClientKind::Mac)
    } else if is_hostname(value) {
        Some(ClientKind::Hostname)
    } else {
        None
    }
}

pub fn is_ipv4_cidr(value: &str) -> bool {
    with_prefix(value, 32, |addr| addr.parse::<Ipv4Addr>().is_ok())
}

pub fn is_ipv6_cidr(value: &str) -> bool {
    with_prefix(value, 128, |addr| addr.parse::<Ipv6Addr>().is_ok())
}

pub fn is_mac(value: &str) -> bool {
    MAC_RE.is_match(value)
}

/// Reserved-character check only; the appliance resolves names itself.
pub fn is_hostname(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "\"'`<>\\&/".contains(c))
}

fn with_prefix(value: &str, max_prefix: u8, addr_ok: impl Fn(&str) -> bool) -> bool {
    match value.split_once('/') {
        None => addr_ok(value),
        Some((addr, prefix)) => {
            !prefix.is_empty()
                && prefix.len() <= 3
                && prefix.bytes().all(|b| b.is_ascii_digit())
                && prefix.parse::<u8>().is_ok_and(|p| p <= max_prefix)
                && addr_ok(addr)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn accepted(raw: &str) -> ValidatedClient {
        validate_client_input(raw).unwrap()
    }

    fn rejection(raw: &str) -> String {
        match validate_client_input(raw) {
            Err(CoreError::Validation { message }) => message,
            other => panic!("expected validation error for {raw:?}, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_blank_are_rejected() {
        assert_eq!(rejection(""), EMPTY_INPUT);
        assert_eq!(rejection("   \t"), EMPTY_INPUT);
    }

    #[test]
    fn ipv4_with_and_without_prefix() {
        assert_eq!(accepted("192.168.1.5").kind, ClientKind::Ipv4);
        assert_eq!(accepted(" 10.0.0.0/8 ").value, "10.0.0.0/8");
        assert_eq!(accepted("0.0.0.0/0").kind, ClientKind::Ipv4);
        assert_eq!(accepted("10.0.0.0/32").kind, ClientKind::Ipv4);
    }

    #[test]
    fn out_of_range_ipv4_prefix_is_not_ipv4() {
        assert!(!is_ipv4_cidr("10.0.0.0/33"));
        assert!(!is_ipv4_cidr("10.0.0.0/"));
        assert!(!is_ipv4_cidr("10.0.0.0/+8"));
        assert!(!is_ipv4_cidr("256.1.1.1"));
    }

    #[test]
    fn ipv6_is_uppercased() {
        let v = accepted("fe80::1ff:fe23:4567:890a");
        assert_eq!(v.kind, ClientKind::Ipv6);
        assert_eq!(v.value, "FE80::1FF:FE23:4567:890A");
        assert_eq!(accepted("2001:db8::/32").value, "2001:DB8::/32");
        assert!(!is_ipv6_cidr("2001:db8::/129"));
    }

    #[test]
    fn mac_is_uppercased() {
        let v = accepted("aa:bb:cc:dd:ee:0f");
        assert_eq!(v.kind, ClientKind::Mac);
        assert_eq!(v.value, "AA:BB:CC:DD:EE:0F");
        assert!(!is_mac("aa-bb-cc-dd-ee-ff"));
        assert!(!is_mac("aa:bb:cc:dd:ee"));
    }

    #[test]
    fn hostnames_keep_their_case() {
        let v = accepted("Laptop.lan");
        assert_eq!(v.kind, ClientKind::Hostname);
        assert_eq!(v.value, "Laptop.lan");
    }

    #[test]
    fn reserved_characters_are_rejected() {
        for raw in ["bad host", "a<b", "quote\"d", "it's", "amp&er", "back\\slash", "10.0.0.0/33"] {
            assert_eq!(rejection(raw), INVALID_INPUT, "{raw:?}");
        }
    }
}
