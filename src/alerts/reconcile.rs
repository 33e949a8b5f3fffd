//! Keep the local alert list's read flags consistent with the server.
//!
//! The local flag is flipped only after the server acknowledged the change.
//! A failed acknowledgement leaves the alert unread and reports the most
//! specific error message available.

use chrono::Utc;

use crate::http::ApiError;
use crate::store::{StudentAction, StudentStore};
use crate::ui::Notifier;

/// Fallback toast text when the error carries nothing more specific.
pub const MARK_READ_FAILED: &str = "Failed to mark alert as read";

/// Something that can record "alert `id` was read" remotely.
pub trait AlertAcknowledger {
    fn acknowledge(&mut self, id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Acknowledged remotely and flipped locally.
    Marked,
    /// Already read; nothing was sent.
    AlreadyRead,
    /// No alert with this id in the local list; nothing was sent.
    NotFound,
    /// The acknowledgement failed. Carries the message that was shown.
    Failed(String),
}

/// Mark one alert as read.
pub fn mark_read<A: AlertAcknowledger + ?Sized>(
    store: &mut StudentStore,
    ack: &mut A,
    notifier: &dyn Notifier,
    id: &str,
) -> ReadOutcome {
    match acknowledge_and_flip(store, ack, id) {
        Ok(outcome) => outcome,
        Err(err) => ReadOutcome::Failed(report_failure(notifier, &err)),
    }
}

fn acknowledge_and_flip<A: AlertAcknowledger + ?Sized>(
    store: &mut StudentStore,
    ack: &mut A,
    id: &str,
) -> Result<ReadOutcome, ApiError> {
    match store.state().find_alert(id) {
        None => return Ok(ReadOutcome::NotFound),
        Some(alert) if alert.read => return Ok(ReadOutcome::AlreadyRead),
        Some(_) => {}
    }

    ack.acknowledge(id)?;
    store.dispatch(StudentAction::MarkRead {
        id: id.to_string(),
        at: Utc::now(),
    });
    Ok(ReadOutcome::Marked)
}

fn report_failure(notifier: &dyn Notifier, err: &ApiError) -> String {
    let message = err.user_message(MARK_READ_FAILED);
    // The session guard has already told the user.
    if *err != ApiError::SessionExpired {
        notifier.error(&message);
    }
    message
}

/// Result of [`mark_all_read`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReadReport {
    pub marked: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl BulkReadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Mark every currently unread alert as read, one request per alert.
///
/// Not transactional: each alert succeeds or fails on its own. An expired
/// session ends the batch, since every later request would go out unsigned.
pub fn mark_all_read<A: AlertAcknowledger + ?Sized>(
    store: &mut StudentStore,
    ack: &mut A,
    notifier: &dyn Notifier,
) -> BulkReadReport {
    let unread: Vec<String> = store
        .alerts()
        .iter()
        .filter(|a| !a.read)
        .map(|a| a.id.clone())
        .collect();

    let mut report = BulkReadReport::default();
    for id in unread {
        match acknowledge_and_flip(store, ack, &id) {
            Ok(ReadOutcome::Marked) => report.marked.push(id),
            Ok(_) => {}
            Err(err) => {
                let expired = err == ApiError::SessionExpired;
                report.failed.push((id, report_failure(notifier, &err)));
                if expired {
                    break;
                }
            }
        }
    }
    report
}
