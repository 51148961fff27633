//! Snapshot reconciliation engine for sectioned lists.
//! This crate owns list content and sequences minimal edits into a render sink.

pub mod logging;
pub mod model;
pub mod reconciler;
pub mod service;
pub mod snapshot;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::list::{header_text, ListItem, SectionKey};
pub use model::user::{
    Contact, Friend, PersonName, UserId, UserRow, UserSection, UserValidationError,
    MISSING_PHONE_SUBTITLE,
};
pub use reconciler::config::{BusyPolicy, ReconcilerConfig};
pub use reconciler::reconciler::{
    ApplyState, ReconcileError, ReconcileResult, Reconciler, Submission,
};
pub use reconciler::sink::{
    ApplyPhase, ApplyProgress, ApplyTicket, DataSource, EditBatch, RecordedBatch, RecordingSink,
    RenderSink, RowAnimation,
};
pub use service::roster_service::{RosterError, RosterReconciler, RosterResult, RosterService};
pub use snapshot::diff::diff;
pub use snapshot::edit::Edit;
pub use snapshot::list_snapshot::{Snapshot, SnapshotError, SnapshotResult};
pub use store::item_store::ItemStore;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
