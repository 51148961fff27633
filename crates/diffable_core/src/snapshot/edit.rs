//! Primitive edit operations produced by the diff engine.

use serde::{Deserialize, Serialize};

/// One primitive list transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit<S, I> {
    /// Header/metadata of `section` must be recomputed. No row motion.
    ReloadSection { section: S },
    /// Insert `item` into `section` before `anchor`, or at the end.
    InsertBefore {
        item: I,
        anchor: Option<I>,
        section: S,
    },
    /// Remove `item` from whichever section holds it.
    Delete { item: I },
    /// Reposition `item` inside `section` before `anchor`, or at the end.
    Move {
        item: I,
        anchor: Option<I>,
        section: S,
    },
}

impl<S: Copy, I: Copy> Edit<S, I> {
    pub fn is_reload(&self) -> bool {
        matches!(self, Self::ReloadSection { .. })
    }

    /// Item touched by a row edit; `None` for section reloads.
    pub fn item(&self) -> Option<I> {
        match self {
            Self::ReloadSection { .. } => None,
            Self::InsertBefore { item, .. } | Self::Delete { item } | Self::Move { item, .. } => {
                Some(*item)
            }
        }
    }
}
