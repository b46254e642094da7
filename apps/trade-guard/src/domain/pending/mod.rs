//! Pending order validation.
//!
//! Callers describe a pending order as a flat [`PendingOrderDraft`]; the
//! [`PendingOrderValidator`] checks every type invariant at once and turns a
//! valid draft into a typed [`PendingOrderSpec`] where invalid price/type
//! combinations cannot be expressed.
//!
//! | Type | Required | Forbidden | Invariant |
//! |------|----------|-----------|-----------|
//! | Limit / Stop | `price` | `stop_trigger`, `limit_price` | `price > 0` |
//! | Buy stop-limit | `stop_trigger`, `limit_price` | `price` | `limit ≤ trigger` |
//! | Sell stop-limit | `stop_trigger`, `limit_price` | `price` | `limit ≥ trigger` |
//! | GTD | future `expiry` | | |

mod errors;
mod offset;
mod types;
mod validator;

pub use errors::{ValidationErrors, ValidationIssue};
pub use offset::pending_price_from_offset;
pub use types::{
    Expiration, PendingKind, PendingOrderDraft, PendingOrderSpec, PendingOrderType, PendingPrice,
    TimeInForce,
};
pub use validator::PendingOrderValidator;
