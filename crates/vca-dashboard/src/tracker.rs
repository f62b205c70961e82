//! Per-item operation tracking.
//!
//! Records, per operation kind, which item ids have a request outstanding so
//! the presentation layer can disable per-item controls. Different ids and
//! different kinds never block each other, and repeated requests for the
//! same id are not deduplicated.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Kind of AI operation tracked per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Analysis,
    Brief,
}

impl OperationKind {
    /// Human-readable name used in notices.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Analysis => "AI analysis",
            OperationKind::Brief => "content brief",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Analysis => f.write_str("analysis"),
            OperationKind::Brief => f.write_str("brief"),
        }
    }
}

/// Busy-sets keyed by operation kind.
///
/// Membership is a set: beginning an id that is already busy adds no second
/// entry. Each id also carries the number of requests still outstanding for
/// it, so every `end` pairs with the `begin` of the same request and an id
/// leaves the set only when its last request completes.
#[derive(Debug, Default)]
pub struct OperationTracker {
    busy: Mutex<HashMap<OperationKind, HashMap<String, usize>>>,
}

impl OperationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` busy for `kind`.
    pub fn begin(&self, kind: OperationKind, id: &str) {
        let mut busy = self.lock();
        *busy
            .entry(kind)
            .or_default()
            .entry(id.to_owned())
            .or_insert(0) += 1;
        tracing::trace!(%kind, id, "operation started");
    }

    /// Completes one outstanding request for `id`. Ending an id with nothing
    /// outstanding is a no-op.
    pub fn end(&self, kind: OperationKind, id: &str) {
        let mut busy = self.lock();
        let Some(ids) = busy.get_mut(&kind) else {
            return;
        };
        if let Some(count) = ids.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                ids.remove(id);
            }
        }
        tracing::trace!(%kind, id, "operation finished");
    }

    /// Starts tracking and returns a guard that ends the request when
    /// dropped, whichever way the caller exits.
    #[must_use = "dropping the guard immediately ends the operation"]
    pub fn track(&self, kind: OperationKind, id: &str) -> InFlight<'_> {
        self.begin(kind, id);
        InFlight {
            tracker: self,
            kind,
            id: id.to_owned(),
        }
    }

    #[must_use]
    pub fn is_busy(&self, kind: OperationKind, id: &str) -> bool {
        self.lock()
            .get(&kind)
            .is_some_and(|ids| ids.contains_key(id))
    }

    /// Snapshot of the busy-set for `kind`.
    #[must_use]
    pub fn busy_ids(&self, kind: OperationKind) -> BTreeSet<String> {
        self.lock()
            .get(&kind)
            .map(|ids| ids.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<OperationKind, HashMap<String, usize>>> {
        self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An outstanding request. Ends its operation exactly once, on drop.
#[derive(Debug)]
pub struct InFlight<'a> {
    tracker: &'a OperationTracker,
    kind: OperationKind,
    id: String,
}

impl InFlight<'_> {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.tracker.end(self.kind, &self.id);
    }
}
