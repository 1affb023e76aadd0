// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. Converted from the wire
// types of `clientele-api`.

mod identity;

pub use identity::IdentityKey;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use clientele_api::{ClientEntry, GroupEntry};

use crate::text::unescape_html;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A configured client row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    /// Raw identifier: IP, CIDR, MAC or host name.
    pub client: String,
    pub name: Option<String>,
    /// Comment as stored on the appliance (HTML-escaped).
    pub comment: Option<String>,
    pub groups: Vec<i64>,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl ClientRecord {
    pub fn key(&self) -> IdentityKey {
        IdentityKey::encode(&self.client)
    }

    /// Comment as the operator typed it.
    pub fn display_comment(&self) -> String {
        self.comment.as_deref().map(unescape_html).unwrap_or_default()
    }

    /// Resolved host name, when the appliance knows one.
    pub fn resolved_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn tooltip(&self) -> String {
        format!(
            "Added: {}\nLast modified: {}\nDatabase ID: {}",
            format_local(self.date_added),
            format_local(self.date_modified),
            self.id
        )
    }
}

fn format_local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

impl From<ClientEntry> for ClientRecord {
    fn from(e: ClientEntry) -> Self {
        Self {
            id: e.id,
            client: e.client,
            name: e.name,
            comment: e.comment,
            groups: e.groups,
            date_added: e.date_added,
            date_modified: e.date_modified,
        }
    }
}

/// A group a client can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub enabled: bool,
    pub comment: Option<String>,
}

impl Group {
    /// Picker label; disabled groups are flagged.
    pub fn label(&self) -> String {
        if self.enabled {
            self.name.clone()
        } else {
            format!("{} (disabled)", self.name)
        }
    }
}

impl From<GroupEntry> for Group {
    fn from(e: GroupEntry) -> Self {
        Self {
            id: e.id,
            name: e.name,
            enabled: e.enabled,
            comment: e.comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record() -> ClientRecord {
        ClientRecord {
            id: 7,
            client: "192.168.1.5".into(),
            name: Some(String::new()),
            comment: Some("Tom &amp; Jerry".into()),
            groups: vec![0],
            date_added: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default(),
            date_modified: Utc.timestamp_opt(1_700_000_100, 0).single().unwrap_or_default(),
        }
    }

    #[test]
    fn display_comment_is_unescaped() {
        assert_eq!(record().display_comment(), "Tom & Jerry");
    }

    #[test]
    fn empty_name_is_not_resolved() {
        assert_eq!(record().resolved_name(), None);
    }

    #[test]
    fn tooltip_has_three_lines_ending_with_id() {
        let tooltip = record().tooltip();
        let lines: Vec<&str> = tooltip.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Added: "));
        assert!(lines[1].starts_with("Last modified: "));
        assert_eq!(lines[2], "Database ID: 7");
    }

    #[test]
    fn disabled_group_is_flagged() {
        let group = Group {
            id: 2,
            name: "Kids".into(),
            enabled: false,
            comment: None,
        };
        assert_eq!(group.label(), "Kids (disabled)");
    }
}
