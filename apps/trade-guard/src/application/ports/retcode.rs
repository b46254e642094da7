//! Trade server return codes.
//!
//! The terminal reports the outcome of every trade request as a numeric
//! return code. Classification happens here, once, so callers never inspect
//! result objects to decide whether to retry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FailureKind;

/// Numeric trade server return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetCode(pub u32);

impl RetCode {
    /// Requote.
    pub const REQUOTE: Self = Self(10004);
    /// Request rejected.
    pub const REJECT: Self = Self(10006);
    /// Request cancelled by trader.
    pub const CANCEL: Self = Self(10007);
    /// Order placed.
    pub const PLACED: Self = Self(10008);
    /// Request completed.
    pub const DONE: Self = Self(10009);
    /// Only part of the request was completed.
    pub const DONE_PARTIAL: Self = Self(10010);
    /// Request processing error.
    pub const ERROR: Self = Self(10011);
    /// Request timed out.
    pub const TIMEOUT: Self = Self(10012);
    /// Invalid request.
    pub const INVALID: Self = Self(10013);
    /// Invalid volume.
    pub const INVALID_VOLUME: Self = Self(10014);
    /// Invalid price.
    pub const INVALID_PRICE: Self = Self(10015);
    /// Invalid stops.
    pub const INVALID_STOPS: Self = Self(10016);
    /// Trading disabled.
    pub const TRADE_DISABLED: Self = Self(10017);
    /// Market closed.
    pub const MARKET_CLOSED: Self = Self(10018);
    /// Not enough money.
    pub const NO_MONEY: Self = Self(10019);
    /// Prices changed.
    pub const PRICE_CHANGED: Self = Self(10020);
    /// No quotes to process the request.
    pub const PRICE_OFF: Self = Self(10021);
    /// Invalid order expiration.
    pub const INVALID_EXPIRATION: Self = Self(10022);
    /// Order state changed.
    pub const ORDER_CHANGED: Self = Self(10023);
    /// Too frequent requests.
    pub const TOO_MANY_REQUESTS: Self = Self(10024);
    /// No changes in request.
    pub const NO_CHANGES: Self = Self(10025);
    /// Request locked for processing.
    pub const LOCKED: Self = Self(10028);
    /// Order or position frozen.
    pub const FROZEN: Self = Self(10029);
    /// No connection with the trade server.
    pub const CONNECTION: Self = Self(10031);
    /// Position already closed.
    pub const POSITION_CLOSED: Self = Self(10036);

    /// Request was accepted, fully or in part.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self.0, 10008..=10010)
    }

    /// Failure class of a non-success code.
    #[must_use]
    pub const fn failure_kind(self) -> FailureKind {
        match self {
            Self::REQUOTE
            | Self::TIMEOUT
            | Self::PRICE_CHANGED
            | Self::PRICE_OFF
            | Self::TOO_MANY_REQUESTS
            | Self::LOCKED
            | Self::CONNECTION => FailureKind::Transient,
            Self::POSITION_CLOSED => FailureKind::NotFound,
            _ => FailureKind::Business,
        }
    }

    /// Short name for known codes.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::REQUOTE => "REQUOTE",
            Self::REJECT => "REJECT",
            Self::CANCEL => "CANCEL",
            Self::PLACED => "PLACED",
            Self::DONE => "DONE",
            Self::DONE_PARTIAL => "DONE_PARTIAL",
            Self::ERROR => "ERROR",
            Self::TIMEOUT => "TIMEOUT",
            Self::INVALID => "INVALID",
            Self::INVALID_VOLUME => "INVALID_VOLUME",
            Self::INVALID_PRICE => "INVALID_PRICE",
            Self::INVALID_STOPS => "INVALID_STOPS",
            Self::TRADE_DISABLED => "TRADE_DISABLED",
            Self::MARKET_CLOSED => "MARKET_CLOSED",
            Self::NO_MONEY => "NO_MONEY",
            Self::PRICE_CHANGED => "PRICE_CHANGED",
            Self::PRICE_OFF => "PRICE_OFF",
            Self::INVALID_EXPIRATION => "INVALID_EXPIRATION",
            Self::ORDER_CHANGED => "ORDER_CHANGED",
            Self::TOO_MANY_REQUESTS => "TOO_MANY_REQUESTS",
            Self::NO_CHANGES => "NO_CHANGES",
            Self::LOCKED => "LOCKED",
            Self::FROZEN => "FROZEN",
            Self::CONNECTION => "CONNECTION",
            Self::POSITION_CLOSED => "POSITION_CLOSED",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Display for RetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}
