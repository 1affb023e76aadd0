// Add-selector options built from the discovery suggestions.

use serde::Serialize;

use clientele_api::SuggestionEntry;

use crate::text::escape_html;

const MOCK_PREFIX: &str = "IP-";

/// One entry of the add selector: `value` is what gets submitted, `label`
/// what the operator sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionOption {
    pub value: String,
    pub label: String,
}

impl SuggestionOption {
    /// The leading "nothing chosen" entry.
    pub fn blank() -> Self {
        Self {
            value: String::new(),
            label: String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}

/// Build selector options. The first option is always blank so nothing is
/// pre-selected.
pub fn build_options(entries: &[SuggestionEntry]) -> Vec<SuggestionOption> {
    std::iter::once(SuggestionOption::blank())
        .chain(entries.iter().map(option_for))
        .collect()
}

fn option_for(entry: &SuggestionEntry) -> SuggestionOption {
    let upper = entry.hwaddr.to_uppercase();
    let (key, mock) = match upper.strip_prefix(MOCK_PREFIX) {
        Some(addr) => (addr.to_owned(), true),
        None => (upper, false),
    };

    let mut extra = Vec::new();
    if let Some(names) = non_empty(entry.names.as_deref()) {
        extra.push(counted(names, "hostname", "hostnames"));
    }
    if let Some(vendor) = non_empty(entry.mac_vendor.as_deref()) {
        extra.push(format!("vendor: {}", escape_html(vendor)));
    }
    if !mock {
        if let Some(addresses) = non_empty(entry.addresses.as_deref()) {
            extra.push(counted(addresses, "address", "addresses"));
        }
    }

    let label = if extra.is_empty() {
        key.clone()
    } else {
        format!("{key} ({})", extra.join("; "))
    };
    SuggestionOption { value: key, label }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn counted(list: &str, singular: &str, plural: &str) -> String {
    let n = list.split(',').count();
    let noun = if n == 1 { singular } else { plural };
    format!("{n} {noun}: {}", escape_html(list))
}
