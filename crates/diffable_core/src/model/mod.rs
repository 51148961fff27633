//! Item and section model shared by the snapshot engine and the roster.
//!
//! # Responsibility
//! - Define the generic contracts the engine needs from items and sections.
//! - Define the concrete friend/contact rows shown in the roster list.
//!
//! # Invariants
//! - Every item is identified by a stable id; equality and hashing use only it.
//! - The section set and its order are fixed at compile time.

pub mod list;
pub mod user;
