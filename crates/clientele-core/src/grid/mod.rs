// ── Client grid model ──
//
// Everything the clients table needs apart from drawing: column metadata,
// ordering, search, pagination and the multi-row selection. Rows are kept
// in server order; the display order is derived on demand.

pub mod prefs;
mod sort;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::model::{ClientRecord, Group, IdentityKey};
use prefs::GridPreferences;

// ── Columns ──────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ColumnId {
    Id,
    Select,
    Client,
    Comment,
    Groups,
    Actions,
}

impl ColumnId {
    pub fn title(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Select => "",
            Self::Client => "Client",
            Self::Comment => "Comment",
            Self::Groups => "Group assignment",
            Self::Actions => "Action",
        }
    }

    pub fn orderable(self) -> bool {
        !matches!(self, Self::Select | Self::Actions)
    }

    pub fn searchable(self) -> bool {
        matches!(self, Self::Client | Self::Comment)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub column: ColumnId,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(column: ColumnId, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::new(ColumnId::Id, SortDirection::Asc)
    }
}

// ── Page size ────────────────────────────────────────────────────────

/// Rows per page. Persisted as the row count, `-1` meaning all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
    All,
}

impl PageSize {
    pub fn rows(self) -> Option<usize> {
        match self {
            Self::Ten => Some(10),
            Self::TwentyFive => Some(25),
            Self::Fifty => Some(50),
            Self::Hundred => Some(100),
            Self::All => None,
        }
    }

    pub fn larger(self) -> Self {
        Self::iter().skip_while(|s| *s != self).nth(1).unwrap_or(self)
    }

    pub fn smaller(self) -> Self {
        Self::iter().take_while(|s| *s != self).last().unwrap_or(self)
    }

    pub fn label(self) -> String {
        self.rows().map_or_else(|| "All".to_owned(), |n| n.to_string())
    }
}

impl From<PageSize> for i64 {
    fn from(size: PageSize) -> Self {
        size.rows()
            .and_then(|n| i64::try_from(n).ok())
            .unwrap_or(-1)
    }
}

impl TryFrom<i64> for PageSize {
    type Error = String;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        match n {
            10 => Ok(Self::Ten),
            25 => Ok(Self::TwentyFive),
            50 => Ok(Self::Fifty),
            100 => Ok(Self::Hundred),
            -1 => Ok(Self::All),
            other => Err(format!("unsupported page size {other}")),
        }
    }
}

/// One option of a row's group picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOption {
    pub id: i64,
    pub label: String,
    pub disabled: bool,
}

// ── ClientGrid ───────────────────────────────────────────────────────

/// State of the clients table.
#[derive(Debug, Clone, Default)]
pub struct ClientGrid {
    rows: Vec<ClientRecord>,
    groups: Vec<Group>,
    prefs: GridPreferences,
    page: usize,
    selected: HashSet<IdentityKey>,
}

impl ClientGrid {
    pub fn new(prefs: GridPreferences) -> Self {
        Self {
            prefs: prefs.normalized(),
            ..Self::default()
        }
    }

    pub fn preferences(&self) -> &GridPreferences {
        &self.prefs
    }

    // ── Data ─────────────────────────────────────────────────────────

    /// Replace rows and groups after a reload. Selections of rows that no
    /// longer exist are dropped.
    pub fn set_data(&mut self, groups: Vec<Group>, rows: Vec<ClientRecord>) {
        self.groups = groups;
        self.rows = rows;
        let present: HashSet<IdentityKey> = self.rows.iter().map(ClientRecord::key).collect();
        self.selected.retain(|k| present.contains(k));
        self.clamp_page();
    }

    pub fn rows(&self) -> &[ClientRecord] {
        &self.rows
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn find(&self, key: &IdentityKey) -> Option<&ClientRecord> {
        self.rows.iter().find(|r| &r.key() == key)
    }

    /// Drop one row locally, ahead of the next reload.
    pub fn remove_row(&mut self, key: &IdentityKey) {
        self.rows.retain(|r| &r.key() != key);
        self.selected.remove(key);
        self.clamp_page();
    }

    // ── Columns ──────────────────────────────────────────────────────

    pub fn visible_columns(&self) -> Vec<ColumnId> {
        self.prefs
            .columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.id)
            .collect()
    }

    /// Show or hide a column. The id column stays hidden.
    pub fn toggle_column(&mut self, column: ColumnId) {
        if column == ColumnId::Id {
            return;
        }
        if let Some(state) = self.prefs.columns.iter_mut().find(|c| c.id == column) {
            state.visible = !state.visible;
        }
    }

    // ── Ordering ─────────────────────────────────────────────────────

    pub fn order(&self) -> SortOrder {
        self.prefs.order
    }

    /// Set the ordering. Returns `false` for non-orderable columns.
    pub fn set_order(&mut self, order: SortOrder) -> bool {
        if !order.column.orderable() {
            return false;
        }
        self.prefs.order = order;
        true
    }

    /// Move the ordering to the next orderable column, ascending.
    pub fn cycle_order_column(&mut self) {
        let orderable: Vec<ColumnId> = ColumnId::iter().filter(|c| c.orderable()).collect();
        let pos = orderable
            .iter()
            .position(|c| *c == self.prefs.order.column)
            .unwrap_or(0);
        let next = orderable[(pos + 1) % orderable.len()];
        self.prefs.order = SortOrder::new(next, SortDirection::Asc);
    }

    pub fn toggle_order_direction(&mut self) {
        self.prefs.order.direction = self.prefs.order.direction.toggled();
    }

    /// Drives visibility of the "reset sorting" control.
    pub fn is_sort_default(&self) -> bool {
        self.prefs.order == SortOrder::default()
    }

    pub fn reset_sort(&mut self) {
        self.prefs.order = SortOrder::default();
    }

    // ── Search ───────────────────────────────────────────────────────

    pub fn search(&self) -> &str {
        &self.prefs.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.prefs.search = query.into();
        self.page = 0;
    }

    fn matches(&self, row: &ClientRecord) -> bool {
        let needle = self.prefs.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        row.client.to_lowercase().contains(&needle)
            || row
                .resolved_name()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
            || row.display_comment().to_lowercase().contains(&needle)
    }

    // ── Display ──────────────────────────────────────────────────────

    /// Rows passing the search, in display order, across all pages.
    pub fn displayed(&self) -> Vec<&ClientRecord> {
        let mut rows: Vec<&ClientRecord> = self.rows.iter().filter(|r| self.matches(r)).collect();
        let order = self.prefs.order;
        rows.sort_by(|a, b| {
            let ord = compare_by(order.column, a, b).then_with(|| a.id.cmp(&b.id));
            match order.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        rows
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> Vec<&ClientRecord> {
        let displayed = self.displayed();
        match self.prefs.page_size.rows() {
            Some(n) => displayed.into_iter().skip(self.page * n).take(n).collect(),
            None => displayed,
        }
    }

    // ── Pagination ───────────────────────────────────────────────────

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        let total = self.displayed().len();
        match self.prefs.page_size.rows() {
            Some(n) if total > 0 => total.div_ceil(n),
            _ => 1,
        }
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn page_size(&self) -> PageSize {
        self.prefs.page_size
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.prefs.page_size = size;
        self.page = 0;
    }

    fn clamp_page(&mut self) {
        let last = self.page_count().saturating_sub(1);
        self.page = self.page.min(last);
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn is_selected(&self, key: &IdentityKey) -> bool {
        self.selected.contains(key)
    }

    pub fn toggle_selected(&mut self, key: &IdentityKey) {
        if !self.selected.remove(key) {
            self.selected.insert(key.clone());
        }
    }

    /// Select every row on the current page.
    pub fn select_page(&mut self) {
        let keys: Vec<IdentityKey> = self.page_rows().iter().map(|r| r.key()).collect();
        self.selected.extend(keys);
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected keys in display order.
    pub fn selected_keys(&self) -> Vec<IdentityKey> {
        let mut keys: Vec<IdentityKey> = self
            .displayed()
            .iter()
            .map(|r| r.key())
            .filter(|k| self.selected.contains(k))
            .collect();
        // Selected rows hidden by the search still count.
        let mut hidden: Vec<IdentityKey> = self
            .rows
            .iter()
            .map(ClientRecord::key)
            .filter(|k| self.selected.contains(k) && !keys.contains(k))
            .collect();
        keys.append(&mut hidden);
        keys
    }

    /// Select-all / deselect-all / delete-selected are only offered while
    /// rows are displayed.
    pub fn bulk_controls_visible(&self) -> bool {
        !self.displayed().is_empty()
    }

    pub fn can_bulk_delete(&self) -> bool {
        self.bulk_controls_visible() && !self.selected.is_empty()
    }

    // ── Groups ───────────────────────────────────────────────────────

    pub fn group_options(&self) -> Vec<GroupOption> {
        self.groups
            .iter()
            .map(|g| GroupOption {
                id: g.id,
                label: g.label(),
                disabled: !g.enabled,
            })
            .collect()
    }

    /// Comma-joined group names of a row; unknown ids shown as numbers.
    pub fn group_names(&self, row: &ClientRecord) -> String {
        let names: HashMap<i64, &str> = self.groups.iter().map(|g| (g.id, g.name.as_str())).collect();
        row.groups
            .iter()
            .map(|id| names.get(id).map_or_else(|| id.to_string(), |n| (*n).to_owned()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn compare_by(column: ColumnId, a: &ClientRecord, b: &ClientRecord) -> Ordering {
    match column {
        ColumnId::Client => sort::compare_clients(&a.client, &b.client),
        ColumnId::Comment => a
            .display_comment()
            .to_lowercase()
            .cmp(&b.display_comment().to_lowercase()),
        ColumnId::Groups => a.groups.cmp(&b.groups),
        ColumnId::Id | ColumnId::Select | ColumnId::Actions => a.id.cmp(&b.id),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(id: i64, client: &str, comment: Option<&str>) -> ClientRecord {
        ClientRecord {
            id,
            client: client.into(),
            name: None,
            comment: comment.map(Into::into),
            groups: vec![0],
            date_added: Utc::now(),
            date_modified: Utc::now(),
        }
    }

    fn group(id: i64, name: &str, enabled: bool) -> Group {
        Group {
            id,
            name: name.into(),
            enabled,
            comment: None,
        }
    }

    fn grid(rows: Vec<ClientRecord>) -> ClientGrid {
        let mut grid = ClientGrid::new(GridPreferences::default());
        grid.set_data(vec![group(0, "Default", true), group(1, "Kids", false)], rows);
        grid
    }

    fn clients<'a>(rows: &[&'a ClientRecord]) -> Vec<&'a str> {
        rows.iter().map(|r| r.client.as_str()).collect()
    }

    #[test]
    fn default_order_is_id_ascending() {
        let grid = grid(vec![row(3, "c", None), row(1, "a", None), row(2, "b", None)]);
        assert!(grid.is_sort_default());
        assert_eq!(clients(&grid.displayed()), vec!["a", "b", "c"]);
    }

    #[test]
    fn client_column_orders_ip_aware_and_reset_restores_default() {
        let mut grid = grid(vec![
            row(1, "192.168.1.10", None),
            row(2, "192.168.1.9", None),
            row(3, "laptop", None),
        ]);
        assert!(grid.set_order(SortOrder::new(ColumnId::Client, SortDirection::Desc)));
        assert!(!grid.is_sort_default());
        assert_eq!(
            clients(&grid.displayed()),
            vec!["laptop", "192.168.1.10", "192.168.1.9"]
        );

        grid.reset_sort();
        assert!(grid.is_sort_default());
        assert_eq!(grid.displayed()[0].id, 1);
    }

    #[test]
    fn non_orderable_columns_are_refused() {
        let mut grid = grid(vec![]);
        assert!(!grid.set_order(SortOrder::new(ColumnId::Select, SortDirection::Asc)));
        assert!(!grid.set_order(SortOrder::new(ColumnId::Actions, SortDirection::Asc)));
        assert!(grid.is_sort_default());
    }

    #[test]
    fn cycle_skips_non_orderable_columns() {
        let mut grid = grid(vec![]);
        grid.cycle_order_column();
        assert_eq!(grid.order().column, ColumnId::Client);
        grid.cycle_order_column();
        grid.cycle_order_column();
        grid.cycle_order_column();
        assert_eq!(grid.order().column, ColumnId::Id);
    }

    #[test]
    fn search_matches_client_and_unescaped_comment() {
        let mut grid = grid(vec![
            row(1, "10.0.0.1", Some("Tom &amp; Jerry")),
            row(2, "10.0.0.2", Some("printer")),
        ]);
        grid.set_search("tom & j");
        assert_eq!(clients(&grid.displayed()), vec!["10.0.0.1"]);
        grid.set_search("0.2");
        assert_eq!(clients(&grid.displayed()), vec!["10.0.0.2"]);
    }

    #[test]
    fn pagination_splits_rows() {
        let rows = (1..=23).map(|i| row(i, &format!("host{i:02}"), None)).collect();
        let mut grid = grid(rows);
        assert_eq!(grid.page_count(), 3);
        grid.next_page();
        grid.next_page();
        grid.next_page();
        assert_eq!(grid.page(), 2);
        assert_eq!(grid.page_rows().len(), 3);

        grid.set_page_size(PageSize::All);
        assert_eq!(grid.page(), 0);
        assert_eq!(grid.page_rows().len(), 23);
    }

    #[test]
    fn page_size_steps_through_menu() {
        assert_eq!(PageSize::Ten.larger(), PageSize::TwentyFive);
        assert_eq!(PageSize::All.larger(), PageSize::All);
        assert_eq!(PageSize::Ten.smaller(), PageSize::Ten);
        assert_eq!(PageSize::All.smaller(), PageSize::Hundred);
        assert_eq!(i64::from(PageSize::All), -1);
    }

    #[test]
    fn selection_follows_display_order() {
        let mut grid = grid(vec![row(1, "b", None), row(2, "a", None), row(3, "c", None)]);
        grid.set_order(SortOrder::new(ColumnId::Client, SortDirection::Asc));
        grid.toggle_selected(&IdentityKey::encode("c"));
        grid.toggle_selected(&IdentityKey::encode("a"));
        assert_eq!(
            grid.selected_keys(),
            vec![IdentityKey::encode("a"), IdentityKey::encode("c")]
        );
    }

    #[test]
    fn bulk_controls_follow_rows_and_selection() {
        let mut grid = grid(vec![]);
        assert!(!grid.bulk_controls_visible());
        assert!(!grid.can_bulk_delete());

        grid.set_data(vec![], vec![row(1, "a", None), row(2, "b", None)]);
        assert!(grid.bulk_controls_visible());
        assert!(!grid.can_bulk_delete());

        grid.select_page();
        assert_eq!(grid.selected_count(), 2);
        assert!(grid.can_bulk_delete());

        grid.deselect_all();
        assert!(!grid.can_bulk_delete());
    }

    #[test]
    fn remove_row_drops_row_and_selection() {
        let mut grid = grid(vec![row(1, "a", None), row(2, "b", None)]);
        let key = IdentityKey::encode("a");
        grid.toggle_selected(&key);
        grid.remove_row(&key);
        assert_eq!(grid.rows().len(), 1);
        assert!(!grid.is_selected(&key));
    }

    #[test]
    fn reload_prunes_vanished_selection() {
        let mut grid = grid(vec![row(1, "a", None), row(2, "b", None)]);
        grid.select_page();
        grid.set_data(vec![], vec![row(2, "b", None)]);
        assert_eq!(grid.selected_keys(), vec![IdentityKey::encode("b")]);
    }

    #[test]
    fn id_column_cannot_be_shown() {
        let mut grid = grid(vec![]);
        grid.toggle_column(ColumnId::Id);
        assert!(!grid.visible_columns().contains(&ColumnId::Id));
        grid.toggle_column(ColumnId::Comment);
        assert!(!grid.visible_columns().contains(&ColumnId::Comment));
    }

    #[test]
    fn group_options_flag_disabled_groups() {
        let grid = grid(vec![]);
        let options = grid.group_options();
        assert_eq!(options[1].label, "Kids (disabled)");
        assert!(options[1].disabled);
        assert!(!options[0].disabled);
    }

    #[test]
    fn column_id_parses_case_insensitively() {
        assert_eq!("client".parse::<ColumnId>().unwrap(), ColumnId::Client);
    }
}
