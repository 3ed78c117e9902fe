use std::collections::HashMap;
use std::hash::Hash;

use crate::error::BandError;
use crate::reorder::{ReorderIntent, ReorderSync, Resolution};

/// Every sortable list of one page (its bands and the slides of each slideshow), with
/// reorder submissions serialised across the whole page.
///
/// At most one list has a submission in flight. Further drops on that list queue behind
/// it; drops on any other list are refused until it resolves. Drops are also refused
/// while a band or slide is being added or removed, and a rebuild requested while a
/// submission is pending is deferred until it resolves.
#[derive(Debug, Clone)]
pub struct PageReorder<K> {
    syncs: HashMap<K, ReorderSync>,
    membership_pending: usize,
    stale: bool,
}

impl<K> Default for PageReorder<K> {
    fn default() -> Self {
        Self {
            syncs: HashMap::new(),
            membership_pending: 0,
            stale: false,
        }
    }
}

impl<K: Eq + Hash + Clone> PageReorder<K> {
    pub fn new(lists: impl IntoIterator<Item = (K, Vec<String>)>) -> Self {
        let mut page = Self::default();
        page.replace(lists);
        page
    }

    pub fn sync(&self, list: &K) -> Option<&ReorderSync> {
        self.syncs.get(list)
    }

    /// The list whose submission is in flight, if any.
    pub fn in_flight(&self) -> Option<&K> {
        self.syncs
            .iter()
            .find(|(_, sync)| sync.is_pending())
            .map(|(list, _)| list)
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight().is_some()
    }

    /// True while a reorder or a membership change waits for the store.
    pub fn is_busy(&self) -> bool {
        self.is_pending() || self.membership_pending > 0
    }

    /// Whether a drop on `list` would be recorded rather than refused.
    pub fn accepts_drop(&self, list: &K) -> bool {
        self.membership_pending == 0 && self.in_flight().is_none_or(|pending| pending == list)
    }

    /// Registers a create or delete request. Refused while a reorder is pending.
    pub fn begin_membership_change(&mut self) -> Result<(), BandError> {
        if self.is_pending() {
            return Err(BandError::invalid_ordering(
                "wait for the pending reorder before adding or removing items",
            ));
        }
        self.membership_pending += 1;
        Ok(())
    }

    /// Marks a create or delete request as answered, successfully or not.
    pub fn end_membership_change(&mut self) {
        self.membership_pending = self.membership_pending.saturating_sub(1);
    }

    /// Replaces every list with freshly confirmed orderings.
    ///
    /// Returns `false` and keeps the current lists when a submission is pending; the
    /// rebuild is then reported by [`PageReorder::needs_rebuild`] once it resolves.
    pub fn rebuild(&mut self, lists: impl IntoIterator<Item = (K, Vec<String>)>) -> bool {
        if self.is_pending() {
            self.stale = true;
            return false;
        }
        self.replace(lists);
        true
    }

    pub fn needs_rebuild(&self) -> bool {
        self.stale && !self.is_pending()
    }

    /// Records a finished drag on `list`; see [`ReorderSync::drag_end`].
    pub fn drag_end(
        &mut self,
        list: &K,
        ordering: Vec<String>,
    ) -> Result<Option<ReorderIntent>, BandError> {
        if self.membership_pending > 0 {
            return Err(BandError::invalid_ordering(
                "items are being added or removed; try again when it finishes",
            ));
        }
        if self.in_flight().is_some_and(|pending| pending != list) {
            return Err(BandError::invalid_ordering(
                "another reorder on this page is still being saved",
            ));
        }
        self.syncs
            .get_mut(list)
            .ok_or_else(|| BandError::not_found("sortable list"))?
            .drag_end(ordering)
    }

    /// Feeds back the outcome of the submission in flight on `list`.
    pub fn resolve(&mut self, list: &K, outcome: Result<(), BandError>) -> Resolution {
        match self.syncs.get_mut(list) {
            Some(sync) => sync.resolve(outcome),
            None => Resolution::Idle,
        }
    }

    fn replace(&mut self, lists: impl IntoIterator<Item = (K, Vec<String>)>) {
        self.syncs = lists
            .into_iter()
            .map(|(list, confirmed)| (list, ReorderSync::new(confirmed)))
            .collect();
        self.stale = false;
    }
}
