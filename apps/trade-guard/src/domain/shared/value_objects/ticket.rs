//! Broker-assigned ticket identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket of a position or pending order, assigned by the trade server.
///
/// Tickets from different contexts share one number space on the terminal,
/// so a single newtype covers positions and orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(u64);

impl Ticket {
    /// Create a ticket from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for Ticket {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_display() {
        assert_eq!(Ticket::new(123_456).to_string(), "#123456");
    }

    #[test]
    fn ticket_ordering() {
        assert!(Ticket::new(1) < Ticket::new(2));
        assert_eq!(Ticket::from(7).value(), 7);
    }
}
