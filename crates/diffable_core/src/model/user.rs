//! Roster rows: friends and contacts.
//!
//! # Responsibility
//! - Define the two row variants and their display fields.
//! - Validate identity and names before rows enter a list.
//!
//! # Invariants
//! - `id` is stable and never reused for another row.
//! - Two rows are equal iff their ids match, regardless of other fields.

use crate::model::list::{ListItem, SectionKey};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Stable identifier for every roster row.
pub type UserId = Uuid;

/// Subtitle shown for a contact without a phone number.
pub const MISSING_PHONE_SUBTITLE: &str = "missing #";

/// Sections of the roster list, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSection {
    Friends,
    Contacts,
}

impl SectionKey for UserSection {
    fn all() -> &'static [Self] {
        &[Self::Friends, Self::Contacts]
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Friends => "Friends",
            Self::Contacts => "Contacts",
        }
    }
}

/// Validation errors for roster rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    NilId,
    BlankFirstName,
    BlankLastName,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "user id must not be nil"),
            Self::BlankFirstName => write!(f, "first name must not be blank"),
            Self::BlankLastName => write!(f, "last name must not be blank"),
        }
    }
}

impl Error for UserValidationError {}

/// Name pair shared by both row variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

impl PersonName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// `"<first> <last>"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn validate(&self) -> Result<(), UserValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(UserValidationError::BlankFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(UserValidationError::BlankLastName);
        }
        Ok(())
    }
}

/// Row shown in the `Friends` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friend {
    pub id: UserId,
    #[serde(flatten)]
    pub name: PersonName,
}

impl Friend {
    /// Creates a friend with a generated id.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: PersonName::new(first_name, last_name),
        }
    }

    /// Creates a friend with a caller-provided id.
    ///
    /// # Errors
    /// - `NilId` when `id` is nil.
    /// - `BlankFirstName`/`BlankLastName` when a name is blank.
    pub fn with_id(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let friend = Self {
            id,
            name: PersonName::new(first_name, last_name),
        };
        friend.validate()?;
        Ok(friend)
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.id.is_nil() {
            return Err(UserValidationError::NilId);
        }
        self.name.validate()
    }
}

/// Row shown in the `Contacts` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: UserId,
    #[serde(flatten)]
    pub name: PersonName,
    pub phone_number: Option<String>,
}

impl Contact {
    /// Creates a contact with a generated id.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: PersonName::new(first_name, last_name),
            phone_number,
        }
    }

    /// Creates a contact with a caller-provided id.
    pub fn with_id(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let contact = Self {
            id,
            name: PersonName::new(first_name, last_name),
            phone_number,
        };
        contact.validate()?;
        Ok(contact)
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.id.is_nil() {
            return Err(UserValidationError::NilId);
        }
        self.name.validate()
    }
}

/// One roster row. Variant decides which section it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserRow {
    Friend(Friend),
    Contact(Contact),
}

impl UserRow {
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Friend(friend) => friend.id,
            Self::Contact(contact) => contact.id,
        }
    }

    /// Section this row is listed under.
    pub fn section(&self) -> UserSection {
        match self {
            Self::Friend(_) => UserSection::Friends,
            Self::Contact(_) => UserSection::Contacts,
        }
    }

    /// Primary cell text.
    pub fn title(&self) -> String {
        match self {
            Self::Friend(friend) => friend.name.full_name(),
            Self::Contact(contact) => contact.name.full_name(),
        }
    }

    /// Secondary cell text. Contacts always have one.
    pub fn subtitle(&self) -> Option<String> {
        match self {
            Self::Friend(_) => None,
            Self::Contact(contact) => Some(
                contact
                    .phone_number
                    .clone()
                    .unwrap_or_else(|| MISSING_PHONE_SUBTITLE.to_string()),
            ),
        }
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        match self {
            Self::Friend(friend) => friend.validate(),
            Self::Contact(contact) => contact.validate(),
        }
    }
}

impl ListItem for UserRow {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.user_id()
    }
}

impl From<Friend> for UserRow {
    fn from(value: Friend) -> Self {
        Self::Friend(value)
    }
}

impl From<Contact> for UserRow {
    fn from(value: Contact) -> Self {
        Self::Contact(value)
    }
}

impl PartialEq for UserRow {
    fn eq(&self, other: &Self) -> bool {
        self.user_id() == other.user_id()
    }
}

impl Eq for UserRow {}

impl Hash for UserRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user_id().hash(state);
    }
}
