//! Aggregate completion tracking across related events.
//!
//! Some notifications only make sense once a *set* of events has been
//! seen — e.g. "your whole order has shipped" requires one terminal event
//! per line item. [`EventCorrelator`] folds those sequences into a single
//! derived [`AggregateCompletion`] signal.
//!
//! Each aggregate is a monotone two-state machine: `tracking` until the
//! observed child set covers the expected set, then `complete`. The
//! transition fires exactly once; entries are retained for the life of the
//! process so duplicate or late events can never re-create an aggregate
//! and fire it again.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Derived signal: every expected child of an aggregate has reached a
/// terminal state. Produced at most once per aggregate id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCompletion {
    pub aggregate_id: String,
    /// Number of children the aggregate was tracked with.
    pub child_count: usize,
}

/// Errors surfaced to the caller of [`EventCorrelator::observe`].
#[derive(Debug, Error)]
pub enum CorrelatorError {
    /// The caller supplied no expected children, so completion would be
    /// meaningless. This is a configuration error, not a runtime one.
    #[error("Expected child set for aggregate {0} is empty")]
    EmptyExpectedSet(String),
}

/// Read-only view of one tracked aggregate, for diagnostics and tests.
#[derive(Debug, Clone)]
pub struct AggregateSnapshot {
    pub expected: usize,
    pub observed: usize,
    pub complete: bool,
}

impl AggregateSnapshot {
    /// Children still short of a terminal state.
    pub fn remaining(&self) -> usize {
        self.expected - self.observed
    }
}

struct TrackedAggregate {
    expected: BTreeSet<String>,
    observed: BTreeSet<String>,
    fired: bool,
}

// ---------------------------------------------------------------------------
// EventCorrelator
// ---------------------------------------------------------------------------

/// Correlates per-child events into per-aggregate completion signals.
///
/// The entry map is guarded by an outer `RwLock` for insertion only; each
/// entry carries its own mutex, so observations for unrelated aggregates
/// never serialize against each other while observations for the same
/// aggregate do — which is what keeps the completion transition
/// at-most-once under concurrent publishers.
pub struct EventCorrelator {
    entries: RwLock<HashMap<String, Arc<Mutex<TrackedAggregate>>>>,
}

impl EventCorrelator {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Record one observation for `aggregate_id`.
    ///
    /// The first observation of an aggregate seeds its entry from
    /// `expected_children`; later calls reuse the seeded set. When
    /// `is_terminal` is true, `child_id` is added to the observed set
    /// (idempotently). The completion signal is returned on the exact
    /// observation that brings the observed set to full coverage, and
    /// never again for the same aggregate.
    ///
    /// # Errors
    ///
    /// [`CorrelatorError::EmptyExpectedSet`] when `expected_children` is
    /// empty — surfaced immediately to the caller rather than tracked.
    pub fn observe(
        &self,
        aggregate_id: &str,
        child_id: &str,
        expected_children: &BTreeSet<String>,
        is_terminal: bool,
    ) -> Result<Option<AggregateCompletion>, CorrelatorError> {
        if expected_children.is_empty() {
            return Err(CorrelatorError::EmptyExpectedSet(aggregate_id.to_string()));
        }

        let entry = self.entry_or_seed(aggregate_id, expected_children);
        let mut state = entry.lock().expect("aggregate entry poisoned");

        if state.expected != *expected_children {
            // The seeded set wins; re-seeding a live aggregate would let a
            // disagreeing publisher reopen or never-complete it.
            tracing::warn!(
                aggregate_id,
                seeded = state.expected.len(),
                supplied = expected_children.len(),
                "Expected child set differs from seeded set, keeping seeded"
            );
        }

        if is_terminal {
            if state.expected.contains(child_id) {
                state.observed.insert(child_id.to_string());
            } else {
                tracing::warn!(
                    aggregate_id,
                    child_id,
                    "Terminal event for child outside the expected set, ignoring"
                );
            }
        }

        tracing::debug!(
            aggregate_id,
            child_id,
            observed = state.observed.len(),
            expected = state.expected.len(),
            "Observed aggregate child"
        );

        if !state.fired && state.observed == state.expected {
            state.fired = true;
            tracing::info!(
                aggregate_id,
                children = state.expected.len(),
                "Aggregate complete, all children terminal"
            );
            return Ok(Some(AggregateCompletion {
                aggregate_id: aggregate_id.to_string(),
                child_count: state.expected.len(),
            }));
        }

        Ok(None)
    }

    /// Current state of a tracked aggregate, if any.
    pub fn snapshot(&self, aggregate_id: &str) -> Option<AggregateSnapshot> {
        let entries = self.entries.read().expect("aggregate map poisoned");
        let entry = entries.get(aggregate_id)?;
        let state = entry.lock().expect("aggregate entry poisoned");
        Some(AggregateSnapshot {
            expected: state.expected.len(),
            observed: state.observed.len(),
            complete: state.fired,
        })
    }

    /// Number of aggregates ever tracked (entries are never evicted).
    pub fn tracked_count(&self) -> usize {
        self.entries.read().expect("aggregate map poisoned").len()
    }

    fn entry_or_seed(
        &self,
        aggregate_id: &str,
        expected_children: &BTreeSet<String>,
    ) -> Arc<Mutex<TrackedAggregate>> {
        if let Some(entry) = self
            .entries
            .read()
            .expect("aggregate map poisoned")
            .get(aggregate_id)
        {
            return Arc::clone(entry);
        }

        let mut entries = self.entries.write().expect("aggregate map poisoned");
        let entry = entries
            .entry(aggregate_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(
                    aggregate_id,
                    children = expected_children.len(),
                    "Tracking new aggregate"
                );
                Arc::new(Mutex::new(TrackedAggregate {
                    expected: expected_children.clone(),
                    observed: BTreeSet::new(),
                    fired: false,
                }))
            });
        Arc::clone(entry)
    }
}

impl Default for EventCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
