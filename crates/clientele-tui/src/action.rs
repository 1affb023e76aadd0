//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;

use clientele_core::{
    ClientRecord, EditIntent, GridPreferences, IdentityKey, Notice, Snapshot, SuggestionOption,
};

/// A destructive operation waiting for y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDelete {
    /// Keys in the order they will be deleted.
    pub keys: Vec<IdentityKey>,
    /// Raw identifiers, for the prompt.
    pub clients: Vec<String>,
}

impl fmt::Display for ConfirmDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.clients.as_slice() {
            [one] => write!(f, "Delete client {one}?"),
            many => write!(f, "Delete {} clients?", many.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ────────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    ToggleHelp,

    // ── Data ─────────────────────────────────────────────────────────
    Reload,
    SnapshotLoaded(Snapshot),
    ClientCountUpdated(u64),
    SuggestionsLoaded(Vec<SuggestionOption>),

    // ── Mutations (screen → app) ─────────────────────────────────────
    AddClient { client: String, comment: String },
    EditClient { record: ClientRecord, intent: EditIntent },
    RequestDelete(ConfirmDelete),

    // ── Mutation progress (app → screen) ─────────────────────────────
    /// A mutation started (`true`) or ended (`false`).
    Busy(bool),
    /// The add form can be cleared.
    AddSucceeded,
    /// Remove the row right away, before the reload.
    ClientDeleted(IdentityKey),
    DeleteFinished,

    // ── Confirmation ─────────────────────────────────────────────────
    ConfirmYes,
    ConfirmNo,

    // ── Misc ─────────────────────────────────────────────────────────
    Notify(Notice),
    /// Sort, search or page size changed; persist.
    PreferencesChanged(GridPreferences),
}
