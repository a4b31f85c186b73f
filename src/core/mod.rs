//! Core layer - Framework-agnostic attendance logic
//!
//! Everything here works on a `sea_orm` connection and plain values; the
//! Discord layer only parses input and formats output. "Today" is always a
//! parameter, never read from the clock inside this layer.

/// Privileged actors and the actions they may perform
pub mod access;
/// Per-day worked/expected hours and day status
pub mod daily;
/// Rolling 30-day presence heatmap
pub mod heatmap;
/// Granting and revoking day pardons
pub mod pardon;
/// Aggregation of a whole accounting period
pub mod period;
/// Punch ledger and its state machine
pub mod punch;
/// Work schedules and accounting period resolution
pub mod schedule;
/// Cached period summaries and their invalidation
pub mod summary;
