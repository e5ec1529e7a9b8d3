//! Portal identity and ordering helpers.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

static NEXT_PORTAL_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier for one registered portal entry.
///
/// Semantics:
/// - IDs are unique for the lifetime of the process and never reused, so entries
///   from different managers can share one store.
/// - A name can be reused after removal; the new entry gets a new ID.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PortalId(u64);

impl PortalId {
    pub(crate) fn next() -> Self {
        Self(NEXT_PORTAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Default prefix for generated portal names.
pub const DEFAULT_NAME_PREFIX: &str = "Portal";

/// Generates a collision-resistant portal name, e.g. `Portal_3f2a..`.
pub fn generate_name(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Returns the last element of an ordered sequence.
pub fn last<T>(items: &[T]) -> Option<&T> {
    items.last()
}

/// Name of the item with the greatest ordering key.
///
/// Ties resolve to the item that appears last in iteration order, matching a
/// stable ascending sort followed by taking the last element.
pub fn top_by_index<'a, I>(items: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let mut ordered: Vec<(&'a str, i64)> = items.into_iter().collect();
    ordered.sort_by_key(|(_, index)| *index);
    last(&ordered).map(|(name, _)| *name)
}
