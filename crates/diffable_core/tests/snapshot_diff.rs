use diffable_core::{diff, Edit, Snapshot, UserSection};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SECTIONS: [UserSection; 2] = [UserSection::Friends, UserSection::Contacts];

fn snapshot(friends: &[u32], contacts: &[u32]) -> Snapshot<UserSection, u32> {
    let mut snapshot = Snapshot::with_sections(&SECTIONS);
    snapshot.append_items(UserSection::Friends, friends).unwrap();
    snapshot.append_items(UserSection::Contacts, contacts).unwrap();
    snapshot
}

fn random_snapshot(rng: &mut StdRng) -> Snapshot<UserSection, u32> {
    let mut pool: Vec<u32> = (0..16).collect();
    pool.shuffle(rng);
    let used = rng.gen_range(0..=pool.len());
    let split = rng.gen_range(0..=used);
    snapshot(&pool[..split], &pool[split..used])
}

fn assert_round_trip(from: &Snapshot<UserSection, u32>, to: &Snapshot<UserSection, u32>) {
    let edits = diff(from, to);
    let mut applied = from.clone();
    applied.apply_all(&edits).unwrap();
    assert_eq!(&applied, to, "edits: {edits:?}");

    let inserts = edits
        .iter()
        .filter(|edit| matches!(edit, Edit::InsertBefore { .. }))
        .count();
    let deletes = edits
        .iter()
        .filter(|edit| matches!(edit, Edit::Delete { .. }))
        .count();
    assert_eq!(from.total_items() + inserts - deletes, to.total_items());
}

#[test]
fn diff_against_itself_is_empty() {
    let snap = snapshot(&[1, 2, 3], &[4]);
    assert!(diff(&snap, &snap).is_empty());
    assert!(diff(&snapshot(&[], &[]), &snapshot(&[], &[])).is_empty());
}

#[test]
fn insert_at_front_anchors_to_previous_first() {
    let edits = diff(&snapshot(&[1], &[]), &snapshot(&[2, 1], &[]));
    assert_eq!(
        edits,
        vec![
            Edit::ReloadSection {
                section: UserSection::Friends
            },
            Edit::InsertBefore {
                item: 2,
                anchor: Some(1),
                section: UserSection::Friends
            },
        ]
    );
}

#[test]
fn insert_into_empty_section_appends() {
    let edits = diff(&snapshot(&[], &[]), &snapshot(&[], &[7]));
    assert_eq!(
        edits,
        vec![
            Edit::ReloadSection {
                section: UserSection::Contacts
            },
            Edit::InsertBefore {
                item: 7,
                anchor: None,
                section: UserSection::Contacts
            },
        ]
    );
}

#[test]
fn multi_insert_preserves_new_relative_order() {
    let from = snapshot(&[], &[]);
    let to = snapshot(&[10, 11, 12], &[]);
    let edits = diff(&from, &to);

    let reloads = edits.iter().filter(|edit| edit.is_reload()).count();
    assert_eq!(reloads, 1);
    assert_round_trip(&from, &to);

    let mut applied = from.clone();
    applied.apply_all(&edits).unwrap();
    assert_eq!(applied.item_identifiers(UserSection::Friends), &[10, 11, 12]);
}

#[test]
fn delete_emits_reload_before_row_edit() {
    let edits = diff(&snapshot(&[1, 2], &[]), &snapshot(&[1], &[]));
    assert_eq!(
        edits,
        vec![
            Edit::ReloadSection {
                section: UserSection::Friends
            },
            Edit::Delete { item: 2 },
        ]
    );
}

#[test]
fn replacing_same_count_skips_reload() {
    let edits = diff(&snapshot(&[1, 2], &[]), &snapshot(&[1, 3], &[]));
    assert!(edits.iter().all(|edit| !edit.is_reload()));
    assert_round_trip(&snapshot(&[1, 2], &[]), &snapshot(&[1, 3], &[]));
}

#[test]
fn reversal_round_trips_with_moves_only() {
    let from = snapshot(&[1, 2, 3, 4, 5], &[]);
    let to = snapshot(&[5, 4, 3, 2, 1], &[]);
    let edits = diff(&from, &to);
    assert!(edits
        .iter()
        .all(|edit| matches!(edit, Edit::Move { .. })));
    assert_eq!(edits.len(), 4);
    assert_round_trip(&from, &to);
}

#[test]
fn mixed_changes_round_trip() {
    let from = snapshot(&[1, 2, 3, 4], &[5, 6]);
    let to = snapshot(&[6, 4, 9, 1], &[2, 8, 5]);
    assert_round_trip(&from, &to);
    assert_round_trip(&to, &from);
}

#[test]
fn random_snapshots_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let from = random_snapshot(&mut rng);
        let to = random_snapshot(&mut rng);
        assert_round_trip(&from, &to);
    }
}
