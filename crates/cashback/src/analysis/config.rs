use crate::rewards::CapResetPolicy;
use crate::transactions::RewardEligibility;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMPROVEMENT_THRESHOLD: Decimal = dec!(0.50);
pub const DEFAULT_TOP_OPPORTUNITIES: usize = 10;

/// Policy knobs shared by the aggregator and the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum per-transaction gain, in currency units, worth reporting.
    pub improvement_threshold: Decimal,
    pub top_opportunities: usize,
    pub cap_reset: CapResetPolicy,
    pub eligibility: RewardEligibility,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            improvement_threshold: DEFAULT_IMPROVEMENT_THRESHOLD,
            top_opportunities: DEFAULT_TOP_OPPORTUNITIES,
            cap_reset: CapResetPolicy::default(),
            eligibility: RewardEligibility::default(),
        }
    }
}
