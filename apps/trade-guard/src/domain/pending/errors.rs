//! Pending order validation errors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use super::types::PendingOrderType;

/// One problem found in a pending order draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// A field the order type needs is absent.
    #[error("{order_type} requires {field}")]
    MissingField {
        /// Order type being validated.
        order_type: PendingOrderType,
        /// Missing field.
        field: &'static str,
    },

    /// A field the order type does not use was supplied.
    #[error("{field} is not allowed for {order_type}")]
    UnexpectedField {
        /// Order type being validated.
        order_type: PendingOrderType,
        /// Offending field.
        field: &'static str,
    },

    /// A price or volume is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// Stop-limit prices are on the wrong side of each other.
    #[error(
        "{order_type} requires limit price {cmp} stop trigger, got limit {limit_price} and trigger {stop_trigger}",
        cmp = limit_bound(.order_type)
    )]
    StopLimitOrdering {
        /// Order type being validated.
        order_type: PendingOrderType,
        /// Trigger price.
        stop_trigger: Decimal,
        /// Limit price.
        limit_price: Decimal,
    },

    /// GTD without an expiry.
    #[error("GTD orders require an expiry")]
    MissingExpiry,

    /// An expiry was given for a non-GTD order.
    #[error("expiry is only allowed with GTD time in force")]
    UnexpectedExpiry,

    /// GTD expiry at or before submission time.
    #[error("expiry {expiry} is not after submission time {now}")]
    ExpiryNotInFuture {
        /// Requested expiry.
        expiry: DateTime<Utc>,
        /// Submission time.
        now: DateTime<Utc>,
    },
}

const fn limit_bound(order_type: &PendingOrderType) -> &'static str {
    if order_type.side().is_long() { "<=" } else { ">=" }
}

/// Every issue found in a draft, in rule order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub(super) Vec<ValidationIssue>);

impl ValidationErrors {
    /// Wrap a non-empty list of issues. Returns `None` if `issues` is empty.
    #[must_use]
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self(issues))
        }
    }

    /// All issues.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    /// Number of issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `issue` was reported.
    #[must_use]
    pub fn contains(&self, issue: &ValidationIssue) -> bool {
        self.0.contains(issue)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pending order: ")?;
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
