//! Use-case services consumed by UI glue.
//!
//! # Responsibility
//! - Expose section-specific mutation entry points.
//! - Keep callers decoupled from reconciler generics.

pub mod roster_service;
