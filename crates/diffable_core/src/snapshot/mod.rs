//! Snapshots of sectioned list content and the diff between two of them.
//!
//! # Responsibility
//! - Describe section order and per-section item order at one point in time.
//! - Compute the ordered edits that turn one snapshot into another.
//!
//! # Invariants
//! - An item id appears in at most one section of a snapshot.
//! - Applying `diff(a, b)` to `a` yields `b`.

pub mod diff;
pub mod edit;
pub mod list_snapshot;
