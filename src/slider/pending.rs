//! Bookkeeping for in-flight slider operations.

use std::collections::HashSet;

/// Kind of a tracked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// A page load (initial, next-slide, go-to-slide or prefetch)
    Load,
    /// A navigation call (`next_slide`, `prev_slide`, `go_to_slide`)
    Navigation,
}

/// Token identifying one tracked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingId {
    kind: OperationKind,
    seq: u64,
}

impl PendingId {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

/// Set of in-flight operation tokens.
///
/// Loads and navigations are tracked separately: the loading flag is true
/// exactly while at least one load token is present.
#[derive(Debug, Default)]
pub struct PendingOperations {
    next_seq: u64,
    loads: HashSet<u64>,
    navigations: HashSet<u64>,
}

impl PendingOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new operation and return its token.
    pub fn insert(&mut self, kind: OperationKind) -> PendingId {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.set_mut(kind).insert(seq);
        PendingId { kind, seq }
    }

    /// Remove a token. Returns `false` if it was not present.
    pub fn remove(&mut self, id: PendingId) -> bool {
        self.set_mut(id.kind).remove(&id.seq)
    }

    pub fn is_loading(&self) -> bool {
        !self.loads.is_empty()
    }

    pub fn loads(&self) -> usize {
        self.loads.len()
    }

    pub fn navigations(&self) -> usize {
        self.navigations.len()
    }

    /// Whether any operation of either kind is in flight.
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty() && self.navigations.is_empty()
    }

    fn set_mut(&mut self, kind: OperationKind) -> &mut HashSet<u64> {
        match kind {
            OperationKind::Load => &mut self.loads,
            OperationKind::Navigation => &mut self.navigations,
        }
    }
}
