use std::collections::{HashSet, VecDeque};

use crate::error::BandError;
use crate::reorder::ReorderIntent;

/// What the caller has to do after a submission resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing was in flight; the outcome is stale and ignored.
    Idle,
    /// The store accepted the intent and nothing is queued.
    Settled,
    /// The store accepted the intent; submit this queued one next.
    Submit(ReorderIntent),
    /// The submission failed. The visible order was restored to `restored` and every
    /// queued ordering was dropped.
    RolledBack {
        restored: Vec<String>,
        error: BandError,
    },
}

/// Optimistic ordering for one sortable list (the bands of a page or the slides of a
/// band) with at most one submission in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderSync {
    confirmed: Vec<String>,
    visible: Vec<String>,
    in_flight: Option<Vec<String>>,
    queued: VecDeque<Vec<String>>,
}

impl ReorderSync {
    pub fn new(confirmed: Vec<String>) -> Self {
        Self {
            visible: confirmed.clone(),
            confirmed,
            in_flight: None,
            queued: VecDeque::new(),
        }
    }

    /// The order currently shown to the user.
    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    /// The last order the store acknowledged.
    pub fn confirmed(&self) -> &[String] {
        &self.confirmed
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// One-based order labels for the visible list.
    pub fn labels(&self) -> Vec<(String, usize)> {
        self.visible
            .iter()
            .enumerate()
            .map(|(rank, id)| (id.clone(), rank + 1))
            .collect()
    }

    /// Records the ordering left by a finished drag and updates the visible order.
    ///
    /// Returns the intent to submit right away when nothing is in flight. Otherwise the
    /// ordering is queued and submitted once the pending one resolves.
    pub fn drag_end(&mut self, ordering: Vec<String>) -> Result<Option<ReorderIntent>, BandError> {
        if ordering.len() != self.visible.len()
            || ordering.iter().collect::<HashSet<_>>() != self.visible.iter().collect::<HashSet<_>>()
        {
            return Err(BandError::invalid_ordering(
                "dragged ordering does not match the visible items",
            ));
        }
        if ordering == self.visible {
            return Ok(None);
        }

        self.visible = ordering.clone();
        if self.in_flight.is_some() {
            self.queued.push_back(ordering);
            return Ok(None);
        }
        let intent = ReorderIntent::from_ordering(&ordering);
        self.in_flight = Some(ordering);
        Ok(Some(intent))
    }

    /// Feeds back the outcome of the submission in flight.
    pub fn resolve(&mut self, outcome: Result<(), BandError>) -> Resolution {
        let Some(submitted) = self.in_flight.take() else {
            return Resolution::Idle;
        };

        match outcome {
            Ok(()) => {
                self.confirmed = submitted;
                match self.queued.pop_front() {
                    Some(next) => {
                        let intent = ReorderIntent::from_ordering(&next);
                        self.in_flight = Some(next);
                        Resolution::Submit(intent)
                    }
                    None => Resolution::Settled,
                }
            }
            Err(error) => {
                self.queued.clear();
                self.visible = self.confirmed.clone();
                Resolution::RolledBack {
                    restored: self.confirmed.clone(),
                    error,
                }
            }
        }
    }
}
