//! Order status and the lifecycle state machine.
//!
//! ```text
//!                 assign                complete
//!  not_accepted ─────────► in_progress ─────────► done
//!        │                      │
//!        │ cancel               │ cancel
//!        ▼                      ▼
//!    cancelled ◄────────────────┘
//! ```
//!
//! `done` and `cancelled` are terminal. `complete` is an administrative
//! transition only; no operator-facing route drives it.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Stored as `snake_case` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, waiting for a client and driver.
    #[default]
    NotAccepted,
    /// Client and driver assigned.
    InProgress,
    /// Ride finished.
    Done,
    /// Withdrawn before completion.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::NotAccepted, Self::InProgress, Self::Done, Self::Cancelled];

    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAccepted => "not_accepted",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }

    /// Whether `transition` may be applied from this status.
    #[must_use]
    pub fn permits(self, transition: OrderTransition) -> bool {
        transition.allowed_from().contains(&self)
    }

    /// Apply a transition, returning the resulting status.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if the transition is not allowed from this status.
    pub fn apply(self, transition: OrderTransition) -> Result<Self, TransitionError> {
        if self.permits(transition) {
            Ok(transition.target())
        } else {
            Err(TransitionError {
                from: self,
                transition,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_owned()))
    }
}

/// A state-changing operation on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderTransition {
    /// Attach a client and driver and start the ride.
    Assign,
    /// Withdraw the order.
    Cancel,
    /// Mark the ride as finished (administrative).
    Complete,
}

impl OrderTransition {
    /// Statuses this transition may start from.
    ///
    /// Persistence uses this list as the guard of its conditional update.
    #[must_use]
    pub const fn allowed_from(self) -> &'static [OrderStatus] {
        match self {
            Self::Assign => &[OrderStatus::NotAccepted],
            Self::Cancel => &[OrderStatus::NotAccepted, OrderStatus::InProgress],
            Self::Complete => &[OrderStatus::InProgress],
        }
    }

    /// Status after the transition succeeds.
    #[must_use]
    pub const fn target(self) -> OrderStatus {
        match self {
            Self::Assign => OrderStatus::InProgress,
            Self::Cancel => OrderStatus::Cancelled,
            Self::Complete => OrderStatus::Done,
        }
    }

    /// Human-readable verb used in rejection messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Assign => "modified",
            Self::Cancel => "cancelled",
            Self::Complete => "completed",
        }
    }
}

impl fmt::Display for OrderTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign => f.write_str("assign"),
            Self::Cancel => f.write_str("cancel"),
            Self::Complete => f.write_str("complete"),
        }
    }
}

/// A transition was attempted from a status that does not permit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("order cannot be {} in its current state ({from})", .transition.verb())]
pub struct TransitionError {
    /// Status the order was in.
    pub from: OrderStatus,
    /// Rejected transition.
    pub transition: OrderTransition,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_accepted() {
        assert_eq!(OrderStatus::default(), OrderStatus::NotAccepted);
    }

    #[test]
    fn test_assign_only_from_not_accepted() {
        assert_eq!(
            OrderStatus::NotAccepted.apply(OrderTransition::Assign),
            Ok(OrderStatus::InProgress)
        );
        for status in [OrderStatus::InProgress, OrderStatus::Done, OrderStatus::Cancelled] {
            let err = status.apply(OrderTransition::Assign).unwrap_err();
            assert_eq!(err.from, status);
        }
    }

    #[test]
    fn test_cancel_from_open_states() {
        assert_eq!(
            OrderStatus::NotAccepted.apply(OrderTransition::Cancel),
            Ok(OrderStatus::Cancelled)
        );
        assert_eq!(
            OrderStatus::InProgress.apply(OrderTransition::Cancel),
            Ok(OrderStatus::Cancelled)
        );
        assert!(OrderStatus::Done.apply(OrderTransition::Cancel).is_err());
        assert!(OrderStatus::Cancelled.apply(OrderTransition::Cancel).is_err());
    }

    #[test]
    fn test_complete_only_from_in_progress() {
        assert_eq!(
            OrderStatus::InProgress.apply(OrderTransition::Complete),
            Ok(OrderStatus::Done)
        );
        assert!(OrderStatus::NotAccepted.apply(OrderTransition::Complete).is_err());
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        let transitions = [
            OrderTransition::Assign,
            OrderTransition::Cancel,
            OrderTransition::Complete,
        ];
        for status in OrderStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for transition in transitions {
                assert!(!status.permits(transition), "{status} permits {transition}");
            }
        }
    }

    #[test]
    fn test_targets_are_never_allowed_sources_of_themselves() {
        // No transition is a self-loop.
        for transition in [
            OrderTransition::Assign,
            OrderTransition::Cancel,
            OrderTransition::Complete,
        ] {
            assert!(!transition.allowed_from().contains(&transition.target()));
        }
    }

    #[test]
    fn test_status_string_roundtrip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("pending".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&OrderStatus::NotAccepted).unwrap();
        assert_eq!(json, "\"not_accepted\"");
    }

    #[test]
    fn test_transition_error_message() {
        let err = OrderStatus::Done.apply(OrderTransition::Assign).unwrap_err();
        assert_eq!(
            err.to_string(),
            "order cannot be modified in its current state (done)"
        );
    }
}
