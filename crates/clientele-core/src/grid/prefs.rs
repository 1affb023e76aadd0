// ── Persisted grid preferences ──
//
// Column order/visibility, page size, sort and search are kept in a JSON
// state file shared by several tables, each under its own key. Missing or
// unreadable state falls back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use super::{ColumnId, PageSize, SortOrder};
use crate::error::CoreError;

/// Key of the clients table inside the state file.
pub const STATE_KEY: &str = "groups-clients-table";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    pub id: ColumnId,
    pub visible: bool,
}

/// Display preferences of the clients table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridPreferences {
    /// Columns in display order.
    pub columns: Vec<ColumnState>,
    pub page_size: PageSize,
    pub order: SortOrder,
    pub search: String,
}

impl Default for GridPreferences {
    fn default() -> Self {
        Self {
            columns: ColumnId::iter()
                .map(|id| ColumnState {
                    id,
                    visible: id != ColumnId::Id,
                })
                .collect(),
            page_size: PageSize::default(),
            order: SortOrder::default(),
            search: String::new(),
        }
    }
}

impl GridPreferences {
    /// Repair loaded state: every column exactly once, unknown order
    /// reset, and the id column always hidden.
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::new();
        self.columns.retain(|c| {
            if seen.contains(&c.id) {
                false
            } else {
                seen.push(c.id);
                true
            }
        });
        for id in ColumnId::iter() {
            if !seen.contains(&id) {
                self.columns.push(ColumnState { id, visible: true });
            }
        }
        for column in &mut self.columns {
            if column.id == ColumnId::Id {
                column.visible = false;
            }
        }
        if !self.order.column.orderable() {
            self.order = SortOrder::default();
        }
        self
    }
}

/// JSON state file holding preferences of one or more tables.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the clients table preferences. Never fails.
    pub fn load(&self) -> GridPreferences {
        let Some(mut state) = self.read_state() else {
            return GridPreferences::default();
        };
        match state.remove(STATE_KEY) {
            Some(value) => match serde_json::from_value::<GridPreferences>(value) {
                Ok(prefs) => prefs.normalized(),
                Err(e) => {
                    warn!(error = %e, path = %self.path.display(), "ignoring corrupt grid state");
                    GridPreferences::default()
                }
            },
            None => GridPreferences::default(),
        }
    }

    /// Save the clients table preferences, keeping other tables' entries.
    pub fn save(&self, prefs: &GridPreferences) -> Result<(), CoreError> {
        let mut state = self.read_state().unwrap_or_default();
        let value = serde_json::to_value(prefs)
            .map_err(|e| CoreError::Internal(format!("failed to serialize grid state: {e}")))?;
        state.insert(STATE_KEY.to_owned(), value);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(&self.path, &e))?;
        }
        let body = serde_json::to_string_pretty(&state)
            .map_err(|e| CoreError::Internal(format!("failed to serialize grid state: {e}")))?;
        std::fs::write(&self.path, body).map_err(|e| io_error(&self.path, &e))?;
        debug!(path = %self.path.display(), "saved grid state");
        Ok(())
    }

    fn read_state(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(map) => Some(map),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "ignoring unreadable state file");
                None
            }
        }
    }
}

fn io_error(path: &Path, e: &std::io::Error) -> CoreError {
    CoreError::Config {
        message: format!("cannot write {}: {e}", path.display()),
    }
}
