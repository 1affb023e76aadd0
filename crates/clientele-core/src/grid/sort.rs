// IP-aware ordering of client identifiers.
//
// Addresses sort numerically (IPv4 before IPv6, then by prefix length),
// everything else after them, case-insensitively.

use std::cmp::Ordering;
use std::net::IpAddr;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ClientSortKey {
    Ip { v6: bool, addr: u128, prefix: u8 },
    Other(String),
}

fn sort_key(client: &str) -> ClientSortKey {
    let (addr, prefix) = match client.split_once('/') {
        Some((addr, prefix)) => (addr, prefix.parse::<u8>().ok()),
        None => (client, None),
    };

    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => ClientSortKey::Ip {
            v6: false,
            addr: u128::from(u32::from(v4)),
            prefix: prefix.unwrap_or(32),
        },
        Ok(IpAddr::V6(v6)) => ClientSortKey::Ip {
            v6: true,
            addr: u128::from(v6),
            prefix: prefix.unwrap_or(128),
        },
        Err(_) => ClientSortKey::Other(client.to_lowercase()),
    }
}

pub(crate) fn compare_clients(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}
