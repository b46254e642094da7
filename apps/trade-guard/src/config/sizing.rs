//! Risk sizing configuration.

use serde::{Deserialize, Serialize};

use crate::domain::sizing::{MinimumLotPolicy, RiskSizerConfig};

/// Risk sizing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizingConfig {
    /// What to do when a sized volume rounds below the broker minimum:
    /// `reject` or `use_broker_minimum`.
    #[serde(default)]
    pub below_minimum: MinimumLotPolicy,
}

impl SizingConfig {
    /// Convert to the sizer configuration.
    #[must_use]
    pub const fn to_sizer_config(&self) -> RiskSizerConfig {
        RiskSizerConfig {
            below_minimum: self.below_minimum,
        }
    }
}
