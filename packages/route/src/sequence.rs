//! Latest-request-wins guard for route calculations.
//!
//! In-flight calculations are never cancelled. Each one takes a [`Ticket`]
//! when it starts; when it finishes, its result is only accepted if no
//! newer ticket has been issued since.

use serde::{Deserialize, Serialize};

/// Sequence number of one calculation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket(u64);

impl Ticket {
    /// The raw sequence number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tickets and decides which results may be displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceGuard {
    issued: u64,
}

impl SequenceGuard {
    /// Creates a guard that has issued nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    /// Starts a new attempt. Every previously issued ticket becomes stale.
    pub const fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Whether `ticket` is the most recently issued one.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// The most recently issued ticket, if any.
    #[must_use]
    pub const fn latest(&self) -> Option<Ticket> {
        if self.issued == 0 {
            None
        } else {
            Some(Ticket(self.issued))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut guard = SequenceGuard::new();
        let first = guard.issue();
        assert!(guard.is_current(first));

        let second = guard.issue();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
        assert_eq!(guard.latest(), Some(second));
    }

    #[test]
    fn out_of_order_completion_keeps_newest() {
        let mut guard = SequenceGuard::new();
        let mut displayed: Option<&str> = None;

        let first = guard.issue();
        let second = guard.issue();

        // Second resolves first.
        if guard.is_current(second) {
            displayed = Some("second");
        }
        // First resolves late and must be discarded.
        if guard.is_current(first) {
            displayed = Some("first");
        }

        assert_eq!(displayed, Some("second"));
    }

    #[test]
    fn fresh_guard_has_no_latest() {
        assert_eq!(SequenceGuard::default().latest(), None);
        assert_eq!(SequenceGuard::new().issue().to_string(), "#1");
    }
}
