//! Backing item storage owned by the reconciler.
//!
//! # Responsibility
//! - Keep the ordered items of every section.
//! - Derive snapshots and live header counts from that content.
//!
//! # Invariants
//! - The section set is `S::all()` and never changes.
//! - Item order inside a section is display order.

pub mod item_store;
