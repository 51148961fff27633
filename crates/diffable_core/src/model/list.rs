//! Generic list contracts.
//!
//! The snapshot and reconciler modules only see items and sections through
//! these traits, so they stay independent of the roster payload.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Ordered, fixed set of sections a list is partitioned into.
pub trait SectionKey: Copy + Eq + Hash + Debug + 'static {
    /// All sections in display order.
    fn all() -> &'static [Self];

    /// Human readable name used in section headers.
    fn display_name(&self) -> &'static str;
}

/// Entry that can be placed in a sectioned list.
pub trait ListItem {
    /// Stable identity token. Never changes for the item's lifetime.
    type Id: Copy + Eq + Hash + Debug + Display;

    fn id(&self) -> Self::Id;
}

/// Formats a section header as `"<count> <display-name>"`.
pub fn header_text<S: SectionKey>(section: S, count: usize) -> String {
    format!("{count} {}", section.display_name())
}
