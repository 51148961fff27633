//! Snapshot diff engine.
//!
//! # Responsibility
//! - Turn two snapshots into an ordered list of primitive edits.
//!
//! # Invariants
//! - Emitted order is: section reloads, deletes, then per section moves
//!   followed by inserts.
//! - Every anchor referenced by an edit is present when that edit applies.
//! - `diff(a, a)` is empty.

use crate::snapshot::edit::Edit;
use crate::snapshot::list_snapshot::Snapshot;
use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Computes edits transforming `old` into `new`.
///
/// Both snapshots are expected to share one section set. Items of sections
/// missing from `new` are deleted.
pub fn diff<S, I>(old: &Snapshot<S, I>, new: &Snapshot<S, I>) -> Vec<Edit<S, I>>
where
    S: Copy + Eq + Debug,
    I: Copy + Eq + Hash + Debug + Display,
{
    let old_index = section_index(old);
    let new_index = section_index(new);

    let mut sections: Vec<S> = new.section_identifiers().collect();
    for section in old.section_identifiers() {
        if !sections.contains(&section) {
            sections.push(section);
        }
    }

    let mut edits = Vec::new();

    for section in &sections {
        if old.number_of_items(*section) != new.number_of_items(*section) {
            edits.push(Edit::ReloadSection { section: *section });
        }
    }

    for section in old.section_identifiers() {
        for item in old.item_identifiers(section) {
            if new_index.get(item) != Some(&section) {
                edits.push(Edit::Delete { item: *item });
            }
        }
    }

    for section in new.section_identifiers() {
        let new_items = new.item_identifiers(section);
        let retained_old: Vec<I> = old
            .item_identifiers(section)
            .iter()
            .copied()
            .filter(|item| new_index.get(item) == Some(&section))
            .collect();
        let retained_new: Vec<I> = new_items
            .iter()
            .copied()
            .filter(|item| old_index.get(item) == Some(&section))
            .collect();

        push_moves(&mut edits, section, &retained_old, &retained_new);

        for (position, item) in new_items.iter().enumerate().rev() {
            if old_index.get(item) != Some(&section) {
                edits.push(Edit::InsertBefore {
                    item: *item,
                    anchor: new_items.get(position + 1).copied(),
                    section,
                });
            }
        }
    }

    edits
}

fn section_index<S, I>(snapshot: &Snapshot<S, I>) -> HashMap<I, S>
where
    S: Copy + Eq + Debug,
    I: Copy + Eq + Hash + Debug + Display,
{
    snapshot
        .section_identifiers()
        .flat_map(|section| {
            snapshot
                .item_identifiers(section)
                .iter()
                .map(move |item| (*item, section))
        })
        .collect()
}

/// Emits moves for retained items whose relative order changed.
///
/// Items on a longest increasing run (in old positions) stay put; the rest
/// are placed before their successor, walking the new order backwards.
fn push_moves<S, I>(edits: &mut Vec<Edit<S, I>>, section: S, old: &[I], new: &[I])
where
    S: Copy,
    I: Copy + Eq + Hash,
{
    if old == new {
        return;
    }

    let old_positions: HashMap<I, usize> = old
        .iter()
        .enumerate()
        .map(|(position, item)| (*item, position))
        .collect();
    let sequence: Vec<usize> = new
        .iter()
        .filter_map(|item| old_positions.get(item).copied())
        .collect();
    let stable: HashSet<I> = longest_increasing_run(&sequence)
        .into_iter()
        .map(|index| new[index])
        .collect();

    for (position, item) in new.iter().enumerate().rev() {
        if !stable.contains(item) {
            edits.push(Edit::Move {
                item: *item,
                anchor: new.get(position + 1).copied(),
                section,
            });
        }
    }
}

/// Indices into `values` forming one longest strictly increasing subsequence.
fn longest_increasing_run(values: &[usize]) -> Vec<usize> {
    // tails[k] = index of the smallest tail of an increasing run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; values.len()];

    for (index, value) in values.iter().enumerate() {
        let slot = tails.partition_point(|&tail| values[tail] < *value);
        if slot > 0 {
            previous[index] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(index);
        } else {
            tails[slot] = index;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(index) = cursor {
        run.push(index);
        cursor = previous[index];
    }
    run.reverse();
    run
}

#[cfg(test)]
mod tests {
    use super::{diff, longest_increasing_run};
    use crate::snapshot::edit::Edit;
    use crate::snapshot::list_snapshot::Snapshot;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Section {
        Left,
        Right,
    }

    fn snapshot(left: &[u32], right: &[u32]) -> Snapshot<Section, u32> {
        let mut snapshot = Snapshot::with_sections(&[Section::Left, Section::Right]);
        snapshot.append_items(Section::Left, left).unwrap();
        snapshot.append_items(Section::Right, right).unwrap();
        snapshot
    }

    #[test]
    fn longest_run_skips_outliers() {
        assert_eq!(longest_increasing_run(&[3, 0, 1, 4, 2]), vec![1, 2, 4]);
        assert!(longest_increasing_run(&[]).is_empty());
    }

    #[test]
    fn reorder_only_emits_moves_without_reload() {
        let edits = diff(&snapshot(&[1, 2, 3], &[]), &snapshot(&[3, 1, 2], &[]));
        assert_eq!(
            edits,
            vec![Edit::Move {
                item: 3,
                anchor: Some(1),
                section: Section::Left
            }]
        );
    }

    #[test]
    fn section_change_is_delete_then_insert() {
        let edits = diff(&snapshot(&[1, 2], &[]), &snapshot(&[2], &[1]));
        assert_eq!(
            edits,
            vec![
                Edit::ReloadSection {
                    section: Section::Left
                },
                Edit::ReloadSection {
                    section: Section::Right
                },
                Edit::Delete { item: 1 },
                Edit::InsertBefore {
                    item: 1,
                    anchor: None,
                    section: Section::Right
                },
            ]
        );
    }
}
