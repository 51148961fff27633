//! Render sink contract.
//!
//! # Responsibility
//! - Define what the reconciler hands outward (edit batches) and what a sink
//!   may read back (live headers and row payloads).
//!
//! # Invariants
//! - Sinks never mutate engine state; `DataSource` is read-only.
//! - A batch reported as `Pending` stays in flight until the host calls
//!   `Reconciler::complete_apply` with its ticket.

use crate::model::list::{ListItem, SectionKey};
use crate::snapshot::edit::Edit;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Row animation requested for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAnimation {
    None,
    Fade,
    Right,
    Left,
}

/// Which half of a mutation a batch carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyPhase {
    /// Section reloads only, never animated.
    Header,
    /// Row inserts/deletes/moves, animated.
    Rows,
}

/// Token matching a completion signal to its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplyTicket(u64);

impl ApplyTicket {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for ApplyTicket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "apply#{}", self.0)
    }
}

/// Ordered edits handed to a sink in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBatch<S, I> {
    pub ticket: ApplyTicket,
    pub phase: ApplyPhase,
    pub animation: RowAnimation,
    pub edits: Vec<Edit<S, I>>,
}

/// Outcome reported by a sink for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyProgress {
    /// Applied synchronously; the reconciler continues right away.
    Complete,
    /// Still animating; completion arrives via `complete_apply`.
    Pending,
}

/// Read-only view a sink may pull from while applying.
pub trait DataSource<S, T: ListItem> {
    /// Live `"<count> <display-name>"` header.
    fn header_text(&self, section: S) -> String;

    /// Row payload for cell rendering.
    ///
    /// Resolves every row a queued or in-flight batch names, including rows
    /// already removed from the store.
    fn item(&self, id: T::Id) -> Option<&T>;
}

/// Consumer that turns edit batches into visible effect.
pub trait RenderSink<S, T: ListItem> {
    fn apply(&mut self, batch: &EditBatch<S, T::Id>, source: &dyn DataSource<S, T>)
        -> ApplyProgress;
}

/// One batch as seen by `RecordingSink`, with the headers it could read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBatch<S, I> {
    pub batch: EditBatch<S, I>,
    pub headers: Vec<(S, String)>,
    /// Row edits whose payload `DataSource::item` could not resolve.
    pub unresolved: Vec<I>,
}

/// Sink that records every batch; used by tests and headless hosts.
#[derive(Debug, Clone)]
pub struct RecordingSink<S, I> {
    progress: ApplyProgress,
    batches: Vec<RecordedBatch<S, I>>,
}

impl<S, I> RecordingSink<S, I> {
    /// Sink completing every batch synchronously.
    pub fn immediate() -> Self {
        Self::with_progress(ApplyProgress::Complete)
    }

    /// Sink leaving every batch in flight.
    pub fn deferred() -> Self {
        Self::with_progress(ApplyProgress::Pending)
    }

    pub fn with_progress(progress: ApplyProgress) -> Self {
        Self {
            progress,
            batches: Vec::new(),
        }
    }

    pub fn batches(&self) -> &[RecordedBatch<S, I>] {
        &self.batches
    }

    pub fn last(&self) -> Option<&RecordedBatch<S, I>> {
        self.batches.last()
    }

    /// All recorded edits, flattened in apply order.
    pub fn edits(&self) -> impl Iterator<Item = &Edit<S, I>> {
        self.batches.iter().flat_map(|recorded| recorded.batch.edits.iter())
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }
}

impl<S: SectionKey, T: ListItem> RenderSink<S, T> for RecordingSink<S, T::Id> {
    fn apply(
        &mut self,
        batch: &EditBatch<S, T::Id>,
        source: &dyn DataSource<S, T>,
    ) -> ApplyProgress {
        let headers = S::all()
            .iter()
            .map(|section| (*section, source.header_text(*section)))
            .collect();
        let unresolved = batch
            .edits
            .iter()
            .filter_map(Edit::item)
            .filter(|id| source.item(*id).is_none())
            .collect();
        self.batches.push(RecordedBatch {
            batch: batch.clone(),
            headers,
            unresolved,
        });
        self.progress
    }
}
