//! Friends/contacts roster service.
//!
//! # Responsibility
//! - Provide add/remove entry points per roster section.
//! - Validate rows before they reach the reconciler.
//!
//! # Invariants
//! - New rows always become the first row of their section.
//! - Service APIs never bypass the reconciler's sequencing.

use crate::model::user::{
    Contact, Friend, UserId, UserRow, UserSection, UserValidationError,
};
use crate::reconciler::config::ReconcilerConfig;
use crate::reconciler::reconciler::{ReconcileError, Reconciler, Submission};
use crate::reconciler::sink::{ApplyTicket, RenderSink};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from roster service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    Validation(UserValidationError),
    Reconcile(ReconcileError<UserSection, UserId>),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Reconcile(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Reconcile(err) => Some(err),
        }
    }
}

impl From<UserValidationError> for RosterError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ReconcileError<UserSection, UserId>> for RosterError {
    fn from(value: ReconcileError<UserSection, UserId>) -> Self {
        Self::Reconcile(value)
    }
}

pub type RosterResult<T> = Result<T, RosterError>;

/// Reconciler specialised to the roster list.
pub type RosterReconciler<K> = Reconciler<UserSection, UserRow, K>;

/// Mutation API over the roster list.
pub struct RosterService<K: RenderSink<UserSection, UserRow>> {
    reconciler: RosterReconciler<K>,
}

impl<K: RenderSink<UserSection, UserRow>> RosterService<K> {
    /// Creates a service with an empty roster rendering into `sink`.
    pub fn new(sink: K, config: ReconcilerConfig) -> Self {
        Self {
            reconciler: Reconciler::new(sink, config),
        }
    }

    /// Adds `friend` as the first row of `Friends`.
    pub fn append_friend(&mut self, friend: Friend) -> RosterResult<Submission> {
        friend.validate()?;
        self.insert(UserRow::Friend(friend))
    }

    /// Adds `contact` as the first row of `Contacts`.
    pub fn append_contact(&mut self, contact: Contact) -> RosterResult<Submission> {
        contact.validate()?;
        self.insert(UserRow::Contact(contact))
    }

    /// Removes one random friend; `None` when there is none or busy.
    pub fn remove_random_friend(&mut self) -> RosterResult<Option<Friend>> {
        let removed = self.reconciler.remove_random(UserSection::Friends)?;
        Ok(removed.and_then(|row| match row {
            UserRow::Friend(friend) => Some(friend),
            UserRow::Contact(_) => None,
        }))
    }

    /// Removes one random contact; `None` when there is none or busy.
    pub fn remove_random_contact(&mut self) -> RosterResult<Option<Contact>> {
        let removed = self.reconciler.remove_random(UserSection::Contacts)?;
        Ok(removed.and_then(|row| match row {
            UserRow::Contact(contact) => Some(contact),
            UserRow::Friend(_) => None,
        }))
    }

    /// Removes one random row of `section` using `rng`.
    pub fn remove_random_with<R: Rng>(
        &mut self,
        section: UserSection,
        rng: &mut R,
    ) -> RosterResult<Option<UserRow>> {
        Ok(self.reconciler.remove_random_with(section, rng)?)
    }

    pub fn friends(&self) -> impl Iterator<Item = &Friend> {
        self.reconciler
            .items(UserSection::Friends)
            .iter()
            .filter_map(|row| match row {
                UserRow::Friend(friend) => Some(friend),
                UserRow::Contact(_) => None,
            })
    }

    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.reconciler
            .items(UserSection::Contacts)
            .iter()
            .filter_map(|row| match row {
                UserRow::Contact(contact) => Some(contact),
                UserRow::Friend(_) => None,
            })
    }

    /// Live header text, e.g. `"2 Friends"`.
    pub fn header_text(&self, section: UserSection) -> String {
        self.reconciler.header_text(section)
    }

    /// Forwards a sink completion signal.
    pub fn complete_apply(&mut self, ticket: ApplyTicket) -> RosterResult<()> {
        Ok(self.reconciler.complete_apply(ticket)?)
    }

    /// Read-only: rows only enter through `append_*`, which keeps every
    /// row in the section matching its variant.
    pub fn reconciler(&self) -> &RosterReconciler<K> {
        &self.reconciler
    }

    fn insert(&mut self, row: UserRow) -> RosterResult<Submission> {
        let section = row.section();
        Ok(self.reconciler.insert_first(row, section)?)
    }
}
