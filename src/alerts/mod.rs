//! Alert list logic: filtering and ordering, read-state reconciliation with
//! the backend, and summary counters.

pub mod filter;
pub mod reconcile;
pub mod stats;

pub use filter::{AlertFilter, apply};
pub use reconcile::{AlertAcknowledger, BulkReadReport, ReadOutcome, mark_all_read, mark_read};
pub use stats::{AlertStats, GeneratedSummary};
