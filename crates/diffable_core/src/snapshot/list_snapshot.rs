//! Snapshot value type.
//!
//! # Responsibility
//! - Hold the ordered section list and the ordered ids inside each section.
//! - Apply primitive edits while enforcing identity invariants.
//!
//! # Invariants
//! - No id is present twice, neither inside one section nor across sections.
//! - A failed edit leaves the snapshot unchanged.

use crate::snapshot::edit::Edit;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// Broken snapshot contract. Never produced by edits that `diff` emitted
/// against the same base snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError<S, I> {
    DuplicateItem(I),
    UnknownAnchor { anchor: I, section: S },
    UnknownItem(I),
    UnknownSection(S),
}

impl<S: Debug, I: Display> Display for SnapshotError<S, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateItem(id) => write!(f, "item already present in snapshot: {id}"),
            Self::UnknownAnchor { anchor, section } => {
                write!(f, "anchor {anchor} not found in section {section:?}")
            }
            Self::UnknownItem(id) => write!(f, "item not found in snapshot: {id}"),
            Self::UnknownSection(section) => write!(f, "section not found: {section:?}"),
        }
    }
}

impl<S: Debug, I: Debug + Display> Error for SnapshotError<S, I> {}

pub type SnapshotResult<T, S, I> = Result<T, SnapshotError<S, I>>;

/// Section order plus item order per section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<S, I> {
    sections: Vec<(S, Vec<I>)>,
}

impl<S, I> Default for Snapshot<S, I> {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
        }
    }
}

impl<S, I> Snapshot<S, I>
where
    S: Copy + Eq + Debug,
    I: Copy + Eq + Hash + Debug + Display,
{
    /// Creates a snapshot with `sections` in the given order and no items.
    pub fn with_sections(sections: &[S]) -> Self {
        let mut snapshot = Self::default();
        for section in sections {
            if !snapshot.has_section(*section) {
                snapshot.sections.push((*section, Vec::new()));
            }
        }
        snapshot
    }

    pub fn section_identifiers(&self) -> impl Iterator<Item = S> + '_ {
        self.sections.iter().map(|(section, _)| *section)
    }

    pub fn has_section(&self, section: S) -> bool {
        self.sections.iter().any(|(candidate, _)| *candidate == section)
    }

    /// Ordered ids of `section`; empty when the section is unknown.
    pub fn item_identifiers(&self, section: S) -> &[I] {
        self.sections
            .iter()
            .find(|(candidate, _)| *candidate == section)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    pub fn number_of_items(&self, section: S) -> usize {
        self.item_identifiers(section).len()
    }

    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|(_, items)| items.len()).sum()
    }

    /// Section currently holding `item`.
    pub fn section_of(&self, item: I) -> Option<S> {
        self.sections
            .iter()
            .find(|(_, items)| items.contains(&item))
            .map(|(section, _)| *section)
    }

    pub fn contains(&self, item: I) -> bool {
        self.section_of(item).is_some()
    }

    /// Appends `items` to the end of `section`, in order.
    ///
    /// # Errors
    /// - `UnknownSection` when `section` is not part of this snapshot.
    /// - `DuplicateItem` when any id is already present; nothing is appended.
    pub fn append_items(&mut self, section: S, items: &[I]) -> SnapshotResult<(), S, I> {
        self.section_index(section)?;
        for (offset, item) in items.iter().enumerate() {
            if self.contains(*item) || items[..offset].contains(item) {
                return Err(SnapshotError::DuplicateItem(*item));
            }
        }
        let index = self.section_index(section)?;
        self.sections[index].1.extend_from_slice(items);
        Ok(())
    }

    /// Applies one edit.
    ///
    /// # Errors
    /// Returns the violated contract; the snapshot is left untouched.
    pub fn apply(&mut self, edit: &Edit<S, I>) -> SnapshotResult<(), S, I> {
        match *edit {
            Edit::ReloadSection { section } => self.section_index(section).map(|_| ()),
            Edit::InsertBefore {
                item,
                anchor,
                section,
            } => {
                if self.contains(item) {
                    return Err(SnapshotError::DuplicateItem(item));
                }
                let index = self.section_index(section)?;
                let position = self.insert_position(index, section, anchor)?;
                self.sections[index].1.insert(position, item);
                Ok(())
            }
            Edit::Delete { item } => {
                let (index, position) = self
                    .locate(item)
                    .ok_or(SnapshotError::UnknownItem(item))?;
                self.sections[index].1.remove(position);
                Ok(())
            }
            Edit::Move {
                item,
                anchor,
                section,
            } => {
                let index = self.section_index(section)?;
                let from = self.sections[index]
                    .1
                    .iter()
                    .position(|candidate| *candidate == item)
                    .ok_or(SnapshotError::UnknownItem(item))?;
                if anchor == Some(item) {
                    return Err(SnapshotError::UnknownAnchor {
                        anchor: item,
                        section,
                    });
                }
                // Validate before mutating so errors leave the order intact.
                self.insert_position(index, section, anchor)?;
                self.sections[index].1.remove(from);
                let to = self.insert_position(index, section, anchor)?;
                self.sections[index].1.insert(to, item);
                Ok(())
            }
        }
    }

    /// Applies `edits` in order, stopping at the first failure.
    pub fn apply_all<'a>(
        &mut self,
        edits: impl IntoIterator<Item = &'a Edit<S, I>>,
    ) -> SnapshotResult<(), S, I>
    where
        S: 'a,
        I: 'a,
    {
        for edit in edits {
            self.apply(edit)?;
        }
        Ok(())
    }

    fn section_index(&self, section: S) -> SnapshotResult<usize, S, I> {
        self.sections
            .iter()
            .position(|(candidate, _)| *candidate == section)
            .ok_or(SnapshotError::UnknownSection(section))
    }

    fn insert_position(
        &self,
        index: usize,
        section: S,
        anchor: Option<I>,
    ) -> SnapshotResult<usize, S, I> {
        let items = &self.sections[index].1;
        match anchor {
            None => Ok(items.len()),
            Some(anchor) => items
                .iter()
                .position(|candidate| *candidate == anchor)
                .ok_or(SnapshotError::UnknownAnchor { anchor, section }),
        }
    }

    fn locate(&self, item: I) -> Option<(usize, usize)> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(index, (_, items))| {
                items
                    .iter()
                    .position(|candidate| *candidate == item)
                    .map(|position| (index, position))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{Snapshot, SnapshotError};
    use crate::snapshot::edit::Edit;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Section {
        Top,
        Bottom,
    }

    fn snapshot(top: &[u32], bottom: &[u32]) -> Snapshot<Section, u32> {
        let mut snapshot = Snapshot::with_sections(&[Section::Top, Section::Bottom]);
        snapshot.append_items(Section::Top, top).unwrap();
        snapshot.append_items(Section::Bottom, bottom).unwrap();
        snapshot
    }

    #[test]
    fn append_rejects_duplicates_across_sections() {
        let mut snap = snapshot(&[1, 2], &[]);
        let err = snap.append_items(Section::Bottom, &[3, 1]).unwrap_err();
        assert_eq!(err, SnapshotError::DuplicateItem(1));
        assert_eq!(snap.item_identifiers(Section::Bottom), &[] as &[u32]);
    }

    #[test]
    fn insert_before_anchor_and_append() {
        let mut snap = snapshot(&[2], &[]);
        snap.apply(&Edit::InsertBefore {
            item: 1,
            anchor: Some(2),
            section: Section::Top,
        })
        .unwrap();
        snap.apply(&Edit::InsertBefore {
            item: 3,
            anchor: None,
            section: Section::Top,
        })
        .unwrap();
        assert_eq!(snap.item_identifiers(Section::Top), &[1, 2, 3]);
    }

    #[test]
    fn insert_with_foreign_anchor_fails_without_mutation() {
        let mut snap = snapshot(&[1], &[2]);
        let err = snap
            .apply(&Edit::InsertBefore {
                item: 9,
                anchor: Some(2),
                section: Section::Top,
            })
            .unwrap_err();
        assert_eq!(
            err,
            SnapshotError::UnknownAnchor {
                anchor: 2,
                section: Section::Top
            }
        );
        assert_eq!(snap, snapshot(&[1], &[2]));
    }

    #[test]
    fn move_repositions_inside_section() {
        let mut snap = snapshot(&[1, 2, 3], &[]);
        snap.apply(&Edit::Move {
            item: 3,
            anchor: Some(1),
            section: Section::Top,
        })
        .unwrap();
        assert_eq!(snap.item_identifiers(Section::Top), &[3, 1, 2]);
        snap.apply(&Edit::Move {
            item: 3,
            anchor: None,
            section: Section::Top,
        })
        .unwrap();
        assert_eq!(snap.item_identifiers(Section::Top), &[1, 2, 3]);
    }

    #[test]
    fn delete_unknown_item_is_reported() {
        let mut snap = snapshot(&[1], &[]);
        assert_eq!(
            snap.apply(&Edit::Delete { item: 7 }).unwrap_err(),
            SnapshotError::UnknownItem(7)
        );
    }
}
