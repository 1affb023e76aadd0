// Wire types for the client-management endpoints.
//
// Response shapes mirror the JSON the appliance emits; request types know
// how to flatten themselves into form fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Responses ────────────────────────────────────────────────────────

/// One row of `GET /api/clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEntry {
    pub id: i64,
    pub client: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub groups: Vec<i64>,
    #[serde(default, with = "chrono::serde::ts_seconds")]
    pub date_added: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_seconds")]
    pub date_modified: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClientList {
    #[serde(default)]
    pub clients: Vec<ClientEntry>,
}

/// One candidate of `GET /api/clients/_suggestions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    #[serde(default)]
    pub hwaddr: String,
    #[serde(default)]
    pub names: Option<String>,
    #[serde(default, rename = "macVendor")]
    pub mac_vendor: Option<String>,
    #[serde(default)]
    pub addresses: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestionList {
    #[serde(default)]
    pub clients: Vec<SuggestionEntry>,
}

/// One row of `GET /api/groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub id: i64,
    pub name: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

fn enabled_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupList {
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
}

/// Row counts of the appliance database (`ftl.database` in `GET /api/info/ftl`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseCounts {
    #[serde(default)]
    pub gravity: i64,
    #[serde(default)]
    pub groups: u64,
    #[serde(default)]
    pub lists: u64,
    #[serde(default)]
    pub clients: u64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FtlSection {
    #[serde(default)]
    pub database: DatabaseCounts,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FtlInfo {
    #[serde(default)]
    pub ftl: FtlSection,
}

// ── Requests ─────────────────────────────────────────────────────────

/// Form body of `POST /api/clients`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub client: String,
    pub comment: String,
}

impl NewClient {
    pub(crate) fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("client", self.client.clone()),
            ("comment", self.comment.clone()),
        ]
    }
}

/// Form body of `PUT /api/clients/{client}`.
///
/// Always the full record: groups, comment and enabled travel together even
/// when only one of them changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientUpdate {
    /// Identity key of the row being edited.
    pub key: String,
    pub groups: Vec<i64>,
    pub comment: String,
    pub enabled: bool,
}

impl ClientUpdate {
    /// Flatten into form pairs. Groups use the bracketed array convention
    /// (`groups[]=1&groups[]=2`); an empty list sends no `groups[]` field.
    pub(crate) fn to_form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![("client", self.key.clone())];
        form.extend(self.groups.iter().map(|g| ("groups[]", g.to_string())));
        form.push(("comment", self.comment.clone()));
        form.push(("enabled", self.enabled.to_string()));
        form
    }
}
