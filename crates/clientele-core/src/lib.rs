//! Client-management logic between `clientele-api` and the UI consumers (CLI / TUI).
//!
//! - **[`ClientManager`]**: cheaply cloneable facade running the add, edit
//!   and delete flows against the appliance. Mutations are serialized by a
//!   manager-wide lock; every flow reloads the dataset it invalidated.
//!
//! - **[`ClientGrid`]**: the table model. Columns, IP-aware ordering, search,
//!   pagination and multi-row selection, restored from and saved to
//!   [`GridPreferences`].
//!
//! - **Input handling**: [`validate_client_input`] normalizes what the
//!   operator typed, [`IdentityKey`] is the reversible row key, and
//!   [`build_options`] turns discovery suggestions into selector entries.
//!
//! - **[`GroupPicker`]**: per-row group membership editor with explicit
//!   apply / dismiss semantics.

pub mod config;
pub mod error;
pub mod grid;
pub mod manager;
pub mod model;
pub mod notice;
pub mod picker;
pub mod suggestion;
pub mod text;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ManagerConfig, TlsVerification};
pub use error::CoreError;
pub use grid::prefs::{GridPreferences, PreferenceStore, STATE_KEY};
pub use grid::{ClientGrid, ColumnId, PageSize, SortDirection, SortOrder};
pub use manager::{
    AddOutcome, ClientManager, DeleteEvent, DeleteFailure, DeleteReport, EditIntent, EditOutcome,
    Reload, Snapshot,
};
pub use model::{ClientRecord, Group, IdentityKey};
pub use notice::{Notice, NoticeLevel};
pub use picker::GroupPicker;
pub use suggestion::{SuggestionOption, build_options};
pub use validate::{ClientKind, ValidatedClient, validate_client_input};
