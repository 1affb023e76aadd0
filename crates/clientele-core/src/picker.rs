use std::collections::BTreeSet;

/// Group membership editor for one row.
///
/// Toggling only changes the pending set. [`apply`](Self::apply) commits it
/// and yields the change-set to submit; [`dismiss`](Self::dismiss) throws
/// pending changes away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPicker {
    committed: BTreeSet<i64>,
    pending: BTreeSet<i64>,
}

impl GroupPicker {
    /// Open the picker on the last server-confirmed membership.
    pub fn new(groups: &[i64]) -> Self {
        let committed: BTreeSet<i64> = groups.iter().copied().collect();
        Self {
            pending: committed.clone(),
            committed,
        }
    }

    pub fn toggle(&mut self, group: i64) {
        if !self.pending.remove(&group) {
            self.pending.insert(group);
        }
    }

    pub fn is_selected(&self, group: i64) -> bool {
        self.pending.contains(&group)
    }

    /// Whether the Apply control is enabled.
    pub fn can_apply(&self) -> bool {
        self.pending != self.committed
    }

    /// Commit pending changes. Returns the full membership to submit, or
    /// `None` when nothing changed.
    pub fn apply(&mut self) -> Option<Vec<i64>> {
        if !self.can_apply() {
            return None;
        }
        self.committed.clone_from(&self.pending);
        Some(self.committed.iter().copied().collect())
    }

    /// Close without applying: revert to the committed membership.
    pub fn dismiss(&mut self) {
        self.pending.clone_from(&self.committed);
    }

    pub fn selection(&self) -> Vec<i64> {
        self.pending.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_enables_apply() {
        let mut picker = GroupPicker::new(&[0]);
        assert!(!picker.can_apply());
        picker.toggle(3);
        assert!(picker.can_apply());
        assert!(picker.is_selected(3));
    }

    #[test]
    fn toggling_back_disables_apply() {
        let mut picker = GroupPicker::new(&[0, 2]);
        picker.toggle(2);
        picker.toggle(2);
        assert!(!picker.can_apply());
    }

    #[test]
    fn dismiss_reverts_to_committed() {
        let mut picker = GroupPicker::new(&[0, 2]);
        picker.toggle(0);
        picker.toggle(5);
        picker.dismiss();
        assert_eq!(picker.selection(), vec![0, 2]);
        assert!(!picker.can_apply());
    }

    #[test]
    fn apply_yields_one_full_change_set() {
        let mut picker = GroupPicker::new(&[0]);
        picker.toggle(4);
        picker.toggle(1);
        assert_eq!(picker.apply(), Some(vec![0, 1, 4]));
        assert_eq!(picker.apply(), None);
        assert!(!picker.can_apply());
    }

    #[test]
    fn dismiss_after_apply_keeps_applied_set() {
        let mut picker = GroupPicker::new(&[]);
        picker.toggle(2);
        picker.apply();
        picker.dismiss();
        assert_eq!(picker.selection(), vec![2]);
    }
}
