//! Reconciler state machine.
//!
//! `Idle -> Applying { ticket, phase } -> Idle`. Every accepted mutation
//! updates the store first, so headers read by the sink always show live
//! counts, then diffs the previous snapshot against the new one and sends
//! reloads before row edits.

use crate::model::list::{ListItem, SectionKey};
use crate::reconciler::config::{BusyPolicy, ReconcilerConfig};
use crate::reconciler::sink::{
    ApplyPhase, ApplyProgress, ApplyTicket, DataSource, EditBatch, RenderSink, RowAnimation,
};
use crate::snapshot::diff::diff;
use crate::snapshot::edit::Edit;
use crate::snapshot::list_snapshot::{Snapshot, SnapshotError};
use crate::store::item_store::ItemStore;
use log::{debug, error, warn};
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Errors from reconciler operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError<S, I> {
    /// An item with this id is already listed.
    DuplicateItem(I),
    /// Completion signal for a batch that is not in flight.
    UnexpectedCompletion(ApplyTicket),
    /// Engine-produced edits broke a snapshot contract.
    Snapshot(SnapshotError<S, I>),
}

impl<S: Debug, I: Display> Display for ReconcileError<S, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateItem(id) => write!(f, "item already listed: {id}"),
            Self::UnexpectedCompletion(ticket) => {
                write!(f, "no batch in flight for completion {ticket}")
            }
            Self::Snapshot(err) => write!(f, "{err}"),
        }
    }
}

impl<S, I> Error for ReconcileError<S, I>
where
    S: Debug + 'static,
    I: Debug + Display + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Snapshot(err) => Some(err),
            Self::DuplicateItem(_) | Self::UnexpectedCompletion(_) => None,
        }
    }
}

impl<S, I> From<SnapshotError<S, I>> for ReconcileError<S, I> {
    fn from(value: SnapshotError<S, I>) -> Self {
        Self::Snapshot(value)
    }
}

pub type ReconcileResult<T, S, I> = Result<T, ReconcileError<S, I>>;

/// Apply state of one reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyState {
    Idle,
    Applying {
        ticket: ApplyTicket,
        phase: ApplyPhase,
    },
}

/// What became of an accepted mutation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Batches were handed to the sink right away.
    Started,
    /// Store updated; batches wait behind the one in flight.
    Queued,
    /// Busy and the policy drops requests; nothing changed.
    Dropped,
}

/// Header and row halves of one mutation, consumed front to back.
#[derive(Debug)]
struct PendingApply<S, I> {
    header: Option<Vec<Edit<S, I>>>,
    rows: Option<(RowAnimation, Vec<Edit<S, I>>)>,
}

impl<S: Copy, I: Copy> PendingApply<S, I> {
    fn from_edits(edits: Vec<Edit<S, I>>) -> Self {
        let (header, rows): (Vec<_>, Vec<_>) = edits.into_iter().partition(Edit::is_reload);
        let animation = row_animation(&rows);
        Self {
            header: Some(header).filter(|edits| !edits.is_empty()),
            rows: Some((animation, rows)).filter(|(_, edits)| !edits.is_empty()),
        }
    }

    fn next_phase(&mut self) -> Option<(ApplyPhase, RowAnimation, Vec<Edit<S, I>>)> {
        if let Some(edits) = self.header.take() {
            return Some((ApplyPhase::Header, RowAnimation::None, edits));
        }
        self.rows
            .take()
            .map(|(animation, edits)| (ApplyPhase::Rows, animation, edits))
    }
}

fn row_animation<S, I>(rows: &[Edit<S, I>]) -> RowAnimation {
    if rows
        .iter()
        .all(|edit| matches!(edit, Edit::InsertBefore { .. }))
    {
        RowAnimation::Right
    } else if rows.iter().all(|edit| matches!(edit, Edit::Delete { .. })) {
        RowAnimation::Left
    } else {
        RowAnimation::Fade
    }
}

/// What a sink reads while a batch is applied: the live store, falling back
/// to rows removed since the reconciler was last idle.
struct ApplyView<'a, S, T: ListItem> {
    store: &'a ItemStore<S, T>,
    retained: &'a HashMap<T::Id, T>,
}

impl<S: SectionKey, T: ListItem> DataSource<S, T> for ApplyView<'_, S, T> {
    fn header_text(&self, section: S) -> String {
        self.store.header_text(section)
    }

    fn item(&self, id: T::Id) -> Option<&T> {
        self.store.item(id).or_else(|| self.retained.get(&id))
    }
}

/// Exclusive owner of list content that sequences edits into a sink.
pub struct Reconciler<S, T, K>
where
    S: SectionKey,
    T: ListItem,
    K: RenderSink<S, T>,
{
    config: ReconcilerConfig,
    store: ItemStore<S, T>,
    /// Snapshot of the store as of the last accepted mutation.
    latest: Snapshot<S, T::Id>,
    /// Snapshot the sink has acknowledged.
    rendered: Snapshot<S, T::Id>,
    sink: K,
    state: ApplyState,
    current: Option<PendingApply<S, T::Id>>,
    queue: VecDeque<PendingApply<S, T::Id>>,
    in_flight: Option<EditBatch<S, T::Id>>,
    /// Payloads of removed rows that queued or in-flight batches may still
    /// name. Emptied whenever the reconciler goes idle.
    retained: HashMap<T::Id, T>,
    next_ticket: u64,
}

impl<S, T, K> Reconciler<S, T, K>
where
    S: SectionKey,
    T: ListItem,
    K: RenderSink<S, T>,
{
    /// Creates an idle reconciler with an empty store.
    pub fn new(sink: K, config: ReconcilerConfig) -> Self {
        let empty = Snapshot::with_sections(S::all());
        debug!(
            "event=reconciler_init module=reconciler status=ok sections={} busy_policy={:?}",
            S::all().len(),
            config.busy_policy
        );
        Self {
            config,
            store: ItemStore::new(),
            latest: empty.clone(),
            rendered: empty,
            sink,
            state: ApplyState::Idle,
            current: None,
            queue: VecDeque::new(),
            in_flight: None,
            retained: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn state(&self) -> ApplyState {
        self.state
    }

    pub fn is_applying(&self) -> bool {
        matches!(self.state, ApplyState::Applying { .. })
    }

    pub fn store(&self) -> &ItemStore<S, T> {
        &self.store
    }

    pub fn items(&self, section: S) -> &[T] {
        self.store.items(section)
    }

    pub fn len(&self, section: S) -> usize {
        self.store.len(section)
    }

    pub fn is_empty(&self, section: S) -> bool {
        self.store.is_empty(section)
    }

    /// Live `"<count> <display-name>"` header.
    pub fn header_text(&self, section: S) -> String {
        self.store.header_text(section)
    }

    /// Snapshot of the store after the last accepted mutation.
    pub fn snapshot(&self) -> &Snapshot<S, T::Id> {
        &self.latest
    }

    /// Snapshot the sink has fully applied so far.
    pub fn rendered_snapshot(&self) -> &Snapshot<S, T::Id> {
        &self.rendered
    }

    /// Batch currently awaiting `complete_apply`.
    pub fn in_flight(&self) -> Option<&EditBatch<S, T::Id>> {
        self.in_flight.as_ref()
    }

    /// Mutations whose batches have not started yet.
    pub fn queued_mutations(&self) -> usize {
        self.queue.len()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Makes `item` the first element of `section`.
    ///
    /// # Errors
    /// - `DuplicateItem` when the id is already listed; nothing changes.
    pub fn insert_first(&mut self, item: T, section: S) -> ReconcileResult<Submission, S, T::Id> {
        let id = item.id();
        if self.should_drop("insert_first") {
            return Ok(Submission::Dropped);
        }
        if self.store.contains(id) {
            warn!(
                "event=insert_rejected module=reconciler status=error reason=duplicate item={id}"
            );
            return Err(ReconcileError::DuplicateItem(id));
        }
        if !self.store.push_front(section, item) {
            return Err(SnapshotError::UnknownSection(section).into());
        }
        debug!(
            "event=insert_first module=reconciler status=ok section={:?} item={id} count={}",
            section,
            self.store.len(section)
        );
        self.submit_store_change()
    }

    /// Removes a uniformly random item of `section` using the thread RNG.
    pub fn remove_random(&mut self, section: S) -> ReconcileResult<Option<T>, S, T::Id>
    where
        T: Clone,
    {
        self.remove_random_with(section, &mut rand::thread_rng())
    }

    /// Removes a uniformly random item of `section` using `rng`.
    ///
    /// Returns `None` without emitting edits when the section is empty or
    /// the request is dropped because a batch is in flight.
    pub fn remove_random_with<R: Rng>(
        &mut self,
        section: S,
        rng: &mut R,
    ) -> ReconcileResult<Option<T>, S, T::Id>
    where
        T: Clone,
    {
        if self.should_drop("remove_random") {
            return Ok(None);
        }
        let count = self.store.len(section);
        if count == 0 {
            debug!("event=remove_random module=reconciler status=noop section={section:?}");
            return Ok(None);
        }

        let index = rng.gen_range(0..count);
        let Some(removed) = self.store.remove_at(section, index) else {
            return Ok(None);
        };
        debug!(
            "event=remove_random module=reconciler status=ok section={:?} item={} count={}",
            section,
            removed.id(),
            self.store.len(section)
        );
        self.retained.insert(removed.id(), removed.clone());
        self.submit_store_change()?;
        Ok(Some(removed))
    }

    /// Reloads every section header without row animation.
    pub fn reload_all(&mut self) -> ReconcileResult<Submission, S, T::Id> {
        if self.should_drop("reload_all") {
            return Ok(Submission::Dropped);
        }
        let reloads = S::all()
            .iter()
            .map(|section| Edit::ReloadSection { section: *section })
            .collect();
        self.submit(PendingApply::from_edits(reloads))
    }

    /// Completion signal for a batch the sink reported as `Pending`.
    ///
    /// # Errors
    /// - `UnexpectedCompletion` when `ticket` is not the batch in flight.
    pub fn complete_apply(&mut self, ticket: ApplyTicket) -> ReconcileResult<(), S, T::Id> {
        let expected = match self.state {
            ApplyState::Applying { ticket, .. } => Some(ticket),
            ApplyState::Idle => None,
        };
        if expected != Some(ticket) || self.in_flight.is_none() {
            warn!(
                "event=apply_complete module=reconciler status=error reason=unexpected ticket={ticket}"
            );
            return Err(ReconcileError::UnexpectedCompletion(ticket));
        }

        if let Some(batch) = self.in_flight.take() {
            self.commit(&batch)?;
        }
        self.drive()
    }

    fn should_drop(&self, operation: &str) -> bool {
        let drop = self.is_applying() && self.config.busy_policy == BusyPolicy::Drop;
        if drop {
            debug!("event=mutation_dropped module=reconciler status=busy operation={operation}");
        }
        drop
    }

    fn submit_store_change(&mut self) -> ReconcileResult<Submission, S, T::Id> {
        let next = self.store.snapshot().map_err(|err| self.contract_failure(err))?;
        let edits = diff(&self.latest, &next);
        self.latest = next;
        self.submit(PendingApply::from_edits(edits))
    }

    fn submit(&mut self, pending: PendingApply<S, T::Id>) -> ReconcileResult<Submission, S, T::Id> {
        if self.is_applying() {
            self.queue.push_back(pending);
            debug!(
                "event=mutation_queued module=reconciler status=ok queued={}",
                self.queue.len()
            );
            return Ok(Submission::Queued);
        }
        self.queue.push_back(pending);
        self.drive()?;
        Ok(Submission::Started)
    }

    /// Sends batches until one is left in flight or nothing remains.
    fn drive(&mut self) -> ReconcileResult<(), S, T::Id> {
        loop {
            if self.current.is_none() {
                self.current = self.queue.pop_front();
            }
            if self.current.is_none() {
                self.state = ApplyState::Idle;
                self.retained.clear();
                return Ok(());
            }

            let Some((phase, animation, edits)) =
                self.current.as_mut().and_then(PendingApply::next_phase)
            else {
                self.current = None;
                continue;
            };

            let ticket = ApplyTicket::new(self.next_ticket);
            self.next_ticket += 1;
            let batch = EditBatch {
                ticket,
                phase,
                animation,
                edits,
            };
            self.state = ApplyState::Applying { ticket, phase };
            debug!(
                "event=apply_batch module=reconciler status=sent ticket={} phase={:?} animation={:?} edits={}",
                ticket,
                phase,
                animation,
                batch.edits.len()
            );

            let view = ApplyView {
                store: &self.store,
                retained: &self.retained,
            };
            match self.sink.apply(&batch, &view) {
                ApplyProgress::Complete => self.commit(&batch)?,
                ApplyProgress::Pending => {
                    self.in_flight = Some(batch);
                    return Ok(());
                }
            }
        }
    }

    fn commit(&mut self, batch: &EditBatch<S, T::Id>) -> ReconcileResult<(), S, T::Id> {
        let mut rendered = self.rendered.clone();
        if let Err(err) = rendered.apply_all(&batch.edits) {
            self.abandon_pending();
            return Err(self.contract_failure(err));
        }
        self.rendered = rendered;
        debug!(
            "event=apply_complete module=reconciler status=ok ticket={} phase={:?}",
            batch.ticket, batch.phase
        );
        Ok(())
    }

    /// Drops every batch not yet committed and returns to `Idle`.
    ///
    /// `rendered` is realigned with `latest` so later diffs start from the
    /// store again; the host should repaint, e.g. via `reload_all`.
    fn abandon_pending(&mut self) {
        warn!(
            "event=apply_abandoned module=reconciler status=error queued={} in_flight={}",
            self.queue.len(),
            self.in_flight.is_some()
        );
        self.current = None;
        self.queue.clear();
        self.in_flight = None;
        self.retained.clear();
        self.rendered = self.latest.clone();
        self.state = ApplyState::Idle;
    }

    fn contract_failure(&self, err: SnapshotError<S, T::Id>) -> ReconcileError<S, T::Id> {
        error!("event=snapshot_contract module=reconciler status=error error={err}");
        ReconcileError::Snapshot(err)
    }
}
