use std::collections::HashMap;

/// Logical resources fetched independently by the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Profile,
    Academic,
    Attendance,
    Engagement,
    Alerts,
}

/// Issued when a fetch starts; presented again when its response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    resource: Resource,
    seq: u64,
}

impl Ticket {
    pub fn resource(&self) -> Resource {
        self.resource
    }
}

/// Per-resource request generation tracking.
///
/// Every fetch takes a ticket with a monotonically increasing sequence
/// number. A response is accepted only if its ticket is newer than the last
/// one accepted for the same resource, so a slow, superseded response can
/// never overwrite fresher data.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    next: u64,
    applied: HashMap<Resource, u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, resource: Resource) -> Ticket {
        self.next += 1;
        Ticket {
            resource,
            seq: self.next,
        }
    }

    /// Record `ticket` as applied if it is the newest seen for its resource.
    ///
    /// Returns `false` (and records nothing) for stale tickets.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        let last = self.applied.entry(ticket.resource).or_insert(0);
        if ticket.seq > *last {
            *last = ticket.seq;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_response_wins_regardless_of_arrival_order() {
        let mut seq = RequestSequencer::new();
        let first = seq.issue(Resource::Alerts);
        let second = seq.issue(Resource::Alerts);

        assert!(seq.accept(second));
        assert!(!seq.accept(first), "late response from superseded request");
    }

    #[test]
    fn resources_are_tracked_independently() {
        let mut seq = RequestSequencer::new();
        let alerts = seq.issue(Resource::Alerts);
        let academic = seq.issue(Resource::Academic);

        assert!(seq.accept(academic));
        assert!(seq.accept(alerts));
        assert_eq!(alerts.resource(), Resource::Alerts);
    }

    #[test]
    fn a_ticket_is_accepted_once() {
        let mut seq = RequestSequencer::new();
        let t = seq.issue(Resource::Profile);
        assert!(seq.accept(t));
        assert!(!seq.accept(t));
    }
}
