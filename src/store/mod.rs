//! Client-held application state.
//!
//! Two stores mirror the dashboard's state: the authentication session and
//! the student datasets (including the alert list). Each store is a plain
//! state struct plus an action enum and a pure `reduce` function, so the
//! mutation rules can be tested without any I/O. The store wrappers add
//! persistence (auth) and stale-response protection (student data).

pub mod auth;
pub mod sequence;
pub mod student;

pub use auth::{AuthAction, AuthStore};
pub use sequence::{RequestSequencer, Resource, Ticket};
pub use student::{StudentAction, StudentState, StudentStore};
