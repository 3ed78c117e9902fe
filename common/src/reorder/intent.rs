use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::BandError;

/// A proposed new ordering: identifier to zero-based rank.
///
/// On the wire (reorder form field `order`) ranks are one-based, see [`Self::to_wire`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReorderIntent(BTreeMap<String, usize>);

impl ReorderIntent {
    pub fn from_ordering(ordering: &[String]) -> Self {
        Self(
            ordering
                .iter()
                .enumerate()
                .map(|(rank, id)| (id.clone(), rank))
                .collect(),
        )
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.0.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(id, rank)| (id.as_str(), *rank))
    }

    /// Identifiers sorted by rank. Ranks must cover `0..len` exactly once.
    pub fn to_ordering(&self) -> Result<Vec<String>, BandError> {
        let mut slots: Vec<Option<&String>> = vec![None; self.0.len()];
        for (id, &rank) in &self.0 {
            let slot = slots.get_mut(rank).ok_or_else(|| {
                BandError::invalid_ordering(format!(
                    "rank {rank} of '{id}' is outside 0..{}",
                    self.0.len()
                ))
            })?;
            if let Some(other) = slot.replace(id) {
                return Err(BandError::invalid_ordering(format!(
                    "'{other}' and '{id}' share rank {rank}"
                )));
            }
        }
        Ok(slots.into_iter().flatten().cloned().collect())
    }

    /// JSON object with one-based ranks, as carried by the reorder form.
    pub fn to_wire(&self) -> String {
        let one_based: BTreeMap<&str, usize> =
            self.0.iter().map(|(id, rank)| (id.as_str(), rank + 1)).collect();
        // A map of strings to integers always serialises.
        serde_json::to_string(&one_based).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parses the one-based wire form. Shape errors are `Validation`, bad ranks are
    /// `InvalidOrdering`.
    pub fn from_wire(json: &str) -> Result<Self, BandError> {
        let raw: BTreeMap<String, i64> = serde_json::from_str(json)
            .map_err(|e| BandError::validation(format!("order must be a JSON object: {e}")))?;

        let mut seen = HashSet::with_capacity(raw.len());
        let mut ranks = BTreeMap::new();
        for (id, rank) in raw {
            if rank < 1 {
                return Err(BandError::invalid_ordering(format!(
                    "order of '{id}' must be at least 1, got {rank}"
                )));
            }
            if !seen.insert(rank) {
                return Err(BandError::invalid_ordering(format!("order {rank} is repeated")));
            }
            ranks.insert(id, (rank - 1) as usize);
        }
        Ok(Self(ranks))
    }
}
