//! Apply sequencer between mutation requests and a render sink.
//!
//! # Responsibility
//! - Own the item store and the latest snapshot.
//! - Turn each mutation into a header batch followed by a row batch.
//! - Keep at most one batch in flight.
//!
//! # Invariants
//! - Header reloads are never sent in the same batch as row edits.
//! - Batches of two mutations never interleave.
//! - Busy policy is fixed per instance.

pub mod config;
#[allow(clippy::module_inception)]
pub mod reconciler;
pub mod sink;
