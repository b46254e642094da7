//! Pending order type-invariant validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::errors::{ValidationErrors, ValidationIssue};
use super::types::{
    Expiration, PendingKind, PendingOrderDraft, PendingOrderSpec, PendingPrice, TimeInForce,
};

/// Validates pending order drafts.
///
/// Pure: no network access, no clock reads. The submission time is passed
/// in so GTD checks are deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingOrderValidator;

impl PendingOrderValidator {
    /// Check every rule and build a typed spec.
    ///
    /// All violations are collected; the draft is never coerced into a
    /// different shape.
    ///
    /// # Errors
    ///
    /// Returns every issue found if any rule fails.
    pub fn validate(
        draft: &PendingOrderDraft,
        now: DateTime<Utc>,
    ) -> Result<PendingOrderSpec, ValidationErrors> {
        let mut issues = Vec::new();

        require_positive(&mut issues, "volume", Some(draft.volume));
        let price = Self::check_prices(draft, &mut issues);
        require_positive(&mut issues, "stop_loss", draft.stop_loss);
        require_positive(&mut issues, "take_profit", draft.take_profit);
        let expiration = Self::check_expiration(draft, now, &mut issues);

        match (price, expiration) {
            (Some(price), Some(expiration)) if issues.is_empty() => Ok(PendingOrderSpec {
                symbol: draft.symbol.clone(),
                side: draft.order_type.side(),
                price,
                volume: draft.volume,
                stop_loss: draft.stop_loss,
                take_profit: draft.take_profit,
                expiration,
                comment: draft.comment.clone(),
            }),
            _ => Err(ValidationErrors(issues)),
        }
    }

    fn check_prices(
        draft: &PendingOrderDraft,
        issues: &mut Vec<ValidationIssue>,
    ) -> Option<PendingPrice> {
        let order_type = draft.order_type;
        let before = issues.len();

        match order_type.kind() {
            kind @ (PendingKind::Limit | PendingKind::Stop) => {
                forbid(issues, draft, "stop_trigger", draft.stop_trigger);
                forbid(issues, draft, "limit_price", draft.limit_price);
                let price = require(issues, draft, "price", draft.price);
                require_positive(issues, "price", price);

                let price = price?;
                (issues.len() == before).then_some(if kind == PendingKind::Limit {
                    PendingPrice::Limit { price }
                } else {
                    PendingPrice::Stop { price }
                })
            }
            PendingKind::StopLimit => {
                forbid(issues, draft, "price", draft.price);
                let stop_trigger = require(issues, draft, "stop_trigger", draft.stop_trigger);
                let limit_price = require(issues, draft, "limit_price", draft.limit_price);
                require_positive(issues, "stop_trigger", stop_trigger);
                require_positive(issues, "limit_price", limit_price);

                let (stop_trigger, limit_price) = (stop_trigger?, limit_price?);
                let ordered = if order_type.side().is_long() {
                    limit_price <= stop_trigger
                } else {
                    limit_price >= stop_trigger
                };
                if !ordered {
                    issues.push(ValidationIssue::StopLimitOrdering {
                        order_type,
                        stop_trigger,
                        limit_price,
                    });
                }

                (issues.len() == before).then_some(PendingPrice::StopLimit {
                    stop_trigger,
                    limit_price,
                })
            }
        }
    }

    fn check_expiration(
        draft: &PendingOrderDraft,
        now: DateTime<Utc>,
        issues: &mut Vec<ValidationIssue>,
    ) -> Option<Expiration> {
        match (draft.time_in_force, draft.expiry) {
            (TimeInForce::Gtc, None) => Some(Expiration::Gtc),
            (TimeInForce::Day, None) => Some(Expiration::Day),
            (TimeInForce::Gtc | TimeInForce::Day, Some(_)) => {
                issues.push(ValidationIssue::UnexpectedExpiry);
                None
            }
            (TimeInForce::Gtd, None) => {
                issues.push(ValidationIssue::MissingExpiry);
                None
            }
            (TimeInForce::Gtd, Some(expiry)) if expiry <= now => {
                issues.push(ValidationIssue::ExpiryNotInFuture { expiry, now });
                None
            }
            (TimeInForce::Gtd, Some(expiry)) => Some(Expiration::Gtd(expiry)),
        }
    }
}

fn require(
    issues: &mut Vec<ValidationIssue>,
    draft: &PendingOrderDraft,
    field: &'static str,
    value: Option<Decimal>,
) -> Option<Decimal> {
    if value.is_none() {
        issues.push(ValidationIssue::MissingField {
            order_type: draft.order_type,
            field,
        });
    }
    value
}

fn forbid(
    issues: &mut Vec<ValidationIssue>,
    draft: &PendingOrderDraft,
    field: &'static str,
    value: Option<Decimal>,
) {
    if value.is_some() {
        issues.push(ValidationIssue::UnexpectedField {
            order_type: draft.order_type,
            field,
        });
    }
}

fn require_positive(issues: &mut Vec<ValidationIssue>, field: &'static str, value: Option<Decimal>) {
    if let Some(value) = value
        && value <= Decimal::ZERO
    {
        issues.push(ValidationIssue::NonPositive { field, value });
    }
}
