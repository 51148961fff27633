//! Per-section item vectors.

use crate::model::list::{header_text, ListItem, SectionKey};
use crate::snapshot::list_snapshot::{Snapshot, SnapshotResult};

/// Ordered items of every section.
#[derive(Debug, Clone)]
pub struct ItemStore<S, T> {
    sections: Vec<(S, Vec<T>)>,
}

impl<S: SectionKey, T: ListItem> Default for ItemStore<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SectionKey, T: ListItem> ItemStore<S, T> {
    /// Creates an empty store holding every section of `S`.
    pub fn new() -> Self {
        Self {
            sections: S::all()
                .iter()
                .map(|section| (*section, Vec::new()))
                .collect(),
        }
    }

    pub fn items(&self, section: S) -> &[T] {
        self.section_items(section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self, section: S) -> usize {
        self.items(section).len()
    }

    pub fn is_empty(&self, section: S) -> bool {
        self.items(section).is_empty()
    }

    /// Returns the item with id `id` from any section.
    pub fn item(&self, id: T::Id) -> Option<&T> {
        self.sections
            .iter()
            .flat_map(|(_, items)| items.iter())
            .find(|item| item.id() == id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.item(id).is_some()
    }

    /// `"<count> <display-name>"` using the live count.
    pub fn header_text(&self, section: S) -> String {
        header_text(section, self.len(section))
    }

    /// Inserts `item` at the front of `section`.
    ///
    /// Returns `false` when the section is not part of `S::all()`.
    pub(crate) fn push_front(&mut self, section: S, item: T) -> bool {
        match self.section_items_mut(section) {
            Some(items) => {
                items.insert(0, item);
                true
            }
            None => false,
        }
    }

    /// Removes the item at `index` of `section`.
    pub(crate) fn remove_at(&mut self, section: S, index: usize) -> Option<T> {
        let items = self.section_items_mut(section)?;
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// Captures current section and item order.
    pub fn snapshot(&self) -> SnapshotResult<Snapshot<S, T::Id>, S, T::Id> {
        let mut snapshot = Snapshot::with_sections(S::all());
        for (section, items) in &self.sections {
            let ids: Vec<T::Id> = items.iter().map(ListItem::id).collect();
            snapshot.append_items(*section, &ids)?;
        }
        Ok(snapshot)
    }

    fn section_items(&self, section: S) -> Option<&Vec<T>> {
        self.sections
            .iter()
            .find(|(candidate, _)| *candidate == section)
            .map(|(_, items)| items)
    }

    fn section_items_mut(&mut self, section: S) -> Option<&mut Vec<T>> {
        self.sections
            .iter_mut()
            .find(|(candidate, _)| *candidate == section)
            .map(|(_, items)| items)
    }
}

#[cfg(test)]
mod tests {
    use super::ItemStore;
    use crate::model::user::{Friend, UserRow, UserSection};

    #[test]
    fn push_front_reverses_call_order_and_updates_header() {
        let mut store: ItemStore<UserSection, UserRow> = ItemStore::new();
        let first = UserRow::from(Friend::new("Grace", "Hopper"));
        let second = UserRow::from(Friend::new("Edsger", "Dijkstra"));
        assert!(store.push_front(UserSection::Friends, first.clone()));
        assert!(store.push_front(UserSection::Friends, second.clone()));

        assert_eq!(store.items(UserSection::Friends), &[second, first]);
        assert_eq!(store.header_text(UserSection::Friends), "2 Friends");
        assert_eq!(store.header_text(UserSection::Contacts), "0 Contacts");
    }

    #[test]
    fn remove_at_out_of_range_is_none() {
        let mut store: ItemStore<UserSection, UserRow> = ItemStore::new();
        assert!(store.remove_at(UserSection::Contacts, 0).is_none());
    }
}
