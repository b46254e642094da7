//! Core risk sizing logic.

use rust_decimal::Decimal;

use super::error::SizingError;
use super::types::{MinimumLotPolicy, RiskRequest, SizedVolume};
use crate::domain::symbol::{SymbolConstraints, VolumeError, normalize_volume};

/// Configuration for risk sizing behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskSizerConfig {
    /// Policy for volumes that round below the broker minimum.
    pub below_minimum: MinimumLotPolicy,
}

/// Converts money-at-risk into lot volume.
#[derive(Debug, Clone, Default)]
pub struct RiskSizer {
    config: RiskSizerConfig,
}

impl RiskSizer {
    /// Create a sizer with custom configuration.
    #[must_use]
    pub const fn with_config(config: RiskSizerConfig) -> Self {
        Self { config }
    }

    /// Volume that loses exactly `risk_money` over `stop_distance_points`,
    /// before grid normalization.
    ///
    /// `risk_money / (stop_distance_points * money_per_point_per_lot)`
    ///
    /// With `point = tick_size = 0.0001` and `tick_value = 10`, one point is
    /// worth 10 per lot, so risking 10 over 100 points gives `10 / 1000 = 0.01`
    /// lot. A full 1.0 lot needs `tick_value = 0.1` for the same inputs.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive inputs, unusable constraints, or
    /// inputs whose arithmetic does not fit in a `Decimal`.
    pub fn raw_volume(
        request: &RiskRequest,
        constraints: &SymbolConstraints,
    ) -> Result<Decimal, SizingError> {
        let money_per_lot = Self::money_per_lot(request, constraints)?;
        request
            .risk_money
            .checked_div(money_per_lot)
            .ok_or_else(|| out_of_range(request))
    }

    /// Size a request and normalize the volume to the lot grid.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Distance or budget is not positive
    /// - Constraints are unusable
    /// - The arithmetic does not fit in a `Decimal`
    /// - The volume rounds below minimum and the policy is `Reject`
    pub fn size(
        &self,
        request: &RiskRequest,
        constraints: &SymbolConstraints,
    ) -> Result<SizedVolume, SizingError> {
        let raw_volume = Self::raw_volume(request, constraints)?;
        let money_per_lot = Self::money_per_lot(request, constraints)?;
        let realized = |volume: Decimal| {
            volume
                .checked_mul(money_per_lot)
                .ok_or_else(|| out_of_range(request))
        };

        let normalized = normalize_volume(
            raw_volume,
            constraints.volume_min,
            constraints.volume_step,
            constraints.volume_max,
        );

        match normalized {
            Ok(volume) => Ok(SizedVolume {
                raw_volume,
                volume,
                realized_risk: realized(volume)?,
                substituted_minimum: false,
            }),
            Err(VolumeError::BelowMinimum {
                normalized, min, ..
            }) => match self.config.below_minimum {
                MinimumLotPolicy::Reject => Err(SizingError::BelowMinimum {
                    raw: raw_volume,
                    normalized,
                    min,
                }),
                MinimumLotPolicy::UseBrokerMinimum => Ok(SizedVolume {
                    raw_volume,
                    volume: min,
                    realized_risk: realized(min)?,
                    substituted_minimum: true,
                }),
            },
            Err(VolumeError::Overflow { .. }) => Err(out_of_range(request)),
            Err(e) => Err(SizingError::InvalidConstraints(e.to_string())),
        }
    }

    /// Account-currency loss of one lot over the stop distance.
    fn money_per_lot(
        request: &RiskRequest,
        constraints: &SymbolConstraints,
    ) -> Result<Decimal, SizingError> {
        Self::validate_input(request)?;
        constraints
            .validate()
            .map_err(|e| SizingError::InvalidConstraints(e.to_string()))?;

        constraints
            .money_per_point_per_lot()
            .and_then(|per_point| request.stop_distance_points.checked_mul(per_point))
            .filter(|money| *money > Decimal::ZERO)
            .ok_or_else(|| out_of_range(request))
    }

    fn validate_input(request: &RiskRequest) -> Result<(), SizingError> {
        if request.stop_distance_points <= Decimal::ZERO {
            return Err(SizingError::InvalidInput(format!(
                "stop distance must be positive, got {} points",
                request.stop_distance_points
            )));
        }

        if request.risk_money <= Decimal::ZERO {
            return Err(SizingError::InvalidInput(format!(
                "risk money must be positive, got {}",
                request.risk_money
            )));
        }

        if let Some(tp) = request.take_profit_points
            && tp <= Decimal::ZERO
        {
            return Err(SizingError::InvalidInput(format!(
                "take-profit distance must be positive, got {tp} points"
            )));
        }

        Ok(())
    }
}

fn out_of_range(request: &RiskRequest) -> SizingError {
    SizingError::InvalidInput(format!(
        "risking {} over {} points is outside the representable volume range",
        request.risk_money, request.stop_distance_points
    ))
}
