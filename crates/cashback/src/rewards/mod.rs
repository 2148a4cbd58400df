//! Reward program definitions, the registry, cap accounting and the
//! institution matcher.

mod caps;
pub mod catalog;
mod matcher;
mod program;
mod registry;

pub use caps::{CapLedger, CapPeriod, CapResetPolicy, CapUsage};
pub(crate) use caps::parse_date;
pub use matcher::{InstitutionMatcher, ISSUER_KEYWORDS};
pub use program::{
    Condition, ProgramKind, Quote, RewardError, RewardProgram, Tier, ALL_PURCHASES_TIER,
    DEFAULT_TIER,
};
pub use registry::{RegistryError, RewardProgramRegistry};
