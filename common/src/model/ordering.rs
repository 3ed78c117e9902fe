//! Contiguous ranking rules shared by bands within a page and slides within a band.
//!
//! Ranks are zero-based and always equal to the item's index in its owning vector.

use std::collections::{HashMap, HashSet};

use crate::error::BandError;

/// An item that owns an identifier and a zero-based rank within its collection.
pub trait Ranked {
    fn id(&self) -> &str;
    fn rank(&self) -> usize;
    fn set_rank(&mut self, rank: usize);
}

/// Rewrites every rank so that it matches the item's position.
pub fn compact<T: Ranked>(items: &mut [T]) {
    for (rank, item) in items.iter_mut().enumerate() {
        item.set_rank(rank);
    }
}

/// Returns the identifiers of `items` in their current order.
pub fn ids_of<T: Ranked>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}

/// Checks that `ordering` names every identifier in `items` exactly once.
pub fn validate_permutation<T: Ranked>(items: &[T], ordering: &[String]) -> Result<(), BandError> {
    if ordering.len() != items.len() {
        return Err(BandError::invalid_ordering(format!(
            "expected {} identifiers, got {}",
            items.len(),
            ordering.len()
        )));
    }

    let current: HashSet<&str> = items.iter().map(Ranked::id).collect();
    let mut seen = HashSet::with_capacity(ordering.len());
    for id in ordering {
        if !current.contains(id.as_str()) {
            return Err(BandError::invalid_ordering(format!("unknown identifier '{id}'")));
        }
        if !seen.insert(id.as_str()) {
            return Err(BandError::invalid_ordering(format!("duplicate identifier '{id}'")));
        }
    }
    Ok(())
}

/// Reorders `items` to follow `ordering`, or leaves them untouched on error.
pub fn apply_ordering<T: Ranked>(items: &mut [T], ordering: &[String]) -> Result<(), BandError> {
    validate_permutation(items, ordering)?;

    let target: HashMap<&str, usize> = ordering
        .iter()
        .enumerate()
        .map(|(rank, id)| (id.as_str(), rank))
        .collect();
    items.sort_by_key(|item| target.get(item.id()).copied().unwrap_or(usize::MAX));
    compact(items);
    Ok(())
}

/// Checks that stored ranks are unique, gap-free and start at zero once sorted.
pub fn validate_contiguous<T: Ranked>(items: &[T]) -> Result<(), BandError> {
    let mut ranks: Vec<usize> = items.iter().map(Ranked::rank).collect();
    ranks.sort_unstable();
    for (expected, rank) in ranks.into_iter().enumerate() {
        if rank != expected {
            return Err(BandError::invalid_ordering(format!(
                "ranks must be contiguous from 0, found {rank} at slot {expected}"
            )));
        }
    }

    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(BandError::validation(format!(
                "duplicate identifier '{}'",
                item.id()
            )));
        }
    }
    Ok(())
}

/// Moves the item `moved` so that it lands at `target_index`, shifting the others.
///
/// Used to turn a drag gesture into the next visual ordering. Unknown identifiers leave
/// the ordering as it is.
pub fn move_to(ordering: &[String], moved: &str, target_index: usize) -> Vec<String> {
    let mut next = ordering.to_vec();
    let Some(from) = next.iter().position(|id| id == moved) else {
        return next;
    };
    let item = next.remove(from);
    let to = target_index.min(next.len());
    next.insert(to, item);
    next
}
