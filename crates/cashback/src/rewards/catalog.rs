use super::caps::CapPeriod;
use super::program::{Condition, ProgramKind, RewardProgram, Tier};
use rust_decimal_macros::dec;

pub const APPLE_CARD: &str = "Apple Card";
pub const BOFA_CASH_REWARDS: &str = "Bank of America Cash Rewards";
pub const BOFA_CUSTOMIZED_CASH: &str = "Bank of America Customized Cash Rewards";
pub const DISCOVER_IT_STUDENT: &str = "Discover It Student Cash Back";
pub const CHASE_SAPPHIRE_PREFERRED: &str = "Chase Sapphire Preferred";
pub const AMEX_GOLD: &str = "American Express Gold Card";
pub const WELLS_FARGO_ACTIVE_CASH: &str = "Wells Fargo Active Cash";
pub const CITI_DOUBLE_CASH: &str = "Citi Double Cash";
pub const AMEX_BLUE_CASH_EVERYDAY: &str = "American Express Blue Cash Everyday";

const APPLE_SELECT_MERCHANTS: &[&str] = &["Apple", "Nike", "Lyft"];
const DINING_CATEGORIES: &[&str] = &["Food and Drink", "Restaurants", "Fast Food"];
const STREAMING_SERVICES: &[&str] = &["Netflix", "Spotify", "Disney+", "HBO", "Hulu", "Amazon Prime"];
const CHASE_TRAVEL_MERCHANTS: &[&str] = &["Chase Travel", "Chase Ultimate Rewards"];
const TRAVEL_CATEGORIES: &[&str] = &["Travel", "Airlines", "Hotel"];
const GROCERY_CATEGORIES: &[&str] = &["Groceries", "Supermarkets", "Grocery"];
const WHOLESALE_CATEGORIES: &[&str] = &["Groceries", "Supermarkets", "Grocery", "Wholesale", "Warehouse"];
const CHOICE_CATEGORIES: &[&str] = &["Gas", "Online Shopping", "Shops"];
const AIRLINE_CATEGORIES: &[&str] = &["Airlines", "Air Travel"];

/// Programs in registry order. Ties in the optimizer resolve to the earlier
/// entry, so keep additions at the end.
pub(crate) fn standard_programs() -> Vec<RewardProgram> {
    vec![
        apple_card(),
        RewardProgram::new(BOFA_CASH_REWARDS, ProgramKind::FlatRate { rate: dec!(0.015) }),
        bofa_customized_cash(),
        discover_it_student(),
        chase_sapphire_preferred(),
        amex_gold(),
        RewardProgram::new(WELLS_FARGO_ACTIVE_CASH, ProgramKind::FlatRate { rate: dec!(0.02) }),
        RewardProgram::new(CITI_DOUBLE_CASH, ProgramKind::FlatRate { rate: dec!(0.02) }),
        amex_blue_cash_everyday(),
    ]
}

fn apple_card() -> RewardProgram {
    RewardProgram::new(
        APPLE_CARD,
        ProgramKind::Tiered {
            tiers: vec![
                Tier::new(
                    "select_merchants",
                    Condition::MerchantContains(APPLE_SELECT_MERCHANTS),
                    dec!(0.03),
                ),
                // Aggregators rarely report wallet payments, so this tier only
                // fires when the feed tags the channel explicitly.
                Tier::new("apple_pay", Condition::Channel("apple_pay"), dec!(0.02)),
            ],
            default_rate: dec!(0.01),
        },
    )
}

fn bofa_customized_cash() -> RewardProgram {
    RewardProgram::new(
        BOFA_CUSTOMIZED_CASH,
        ProgramKind::Capped {
            tiers: vec![
                Tier::new(
                    "category_choice",
                    Condition::CategoryContains(CHOICE_CATEGORIES),
                    dec!(0.03),
                ),
                Tier::new(
                    "grocery_wholesale",
                    Condition::CategoryContains(WHOLESALE_CATEGORIES),
                    dec!(0.02),
                ),
            ],
            default_rate: dec!(0.01),
            spend_cap: dec!(2500),
            reward_ceiling: None,
            period: CapPeriod::Quarterly,
        },
    )
}

fn discover_it_student() -> RewardProgram {
    RewardProgram::new(
        DISCOVER_IT_STUDENT,
        ProgramKind::Capped {
            tiers: vec![Tier::new(
                "quarterly_category",
                Condition::CategoryContains(WHOLESALE_CATEGORIES),
                dec!(0.05),
            )],
            default_rate: dec!(0.01),
            spend_cap: dec!(1500),
            reward_ceiling: Some(dec!(75)),
            period: CapPeriod::Quarterly,
        },
    )
}

fn chase_sapphire_preferred() -> RewardProgram {
    RewardProgram::new(
        CHASE_SAPPHIRE_PREFERRED,
        ProgramKind::Tiered {
            tiers: vec![
                Tier::new(
                    "travel",
                    Condition::MerchantContains(CHASE_TRAVEL_MERCHANTS),
                    dec!(0.05),
                ),
                Tier::new(
                    "dining",
                    Condition::CategoryContains(DINING_CATEGORIES),
                    dec!(0.03),
                ),
                Tier::new(
                    "streaming",
                    Condition::MerchantContains(STREAMING_SERVICES),
                    dec!(0.03),
                ),
                Tier::new(
                    "online_grocery",
                    Condition::All(vec![
                        Condition::CategoryContains(&["Groceries"]),
                        Condition::MerchantContains(&["online"]),
                    ]),
                    dec!(0.03),
                ),
                Tier::new(
                    "other_travel",
                    Condition::CategoryContains(TRAVEL_CATEGORIES),
                    dec!(0.02),
                ),
            ],
            default_rate: dec!(0.01),
        },
    )
}

fn amex_gold() -> RewardProgram {
    RewardProgram::new(
        AMEX_GOLD,
        ProgramKind::Tiered {
            tiers: vec![
                Tier::new(
                    "dining",
                    Condition::CategoryContains(DINING_CATEGORIES),
                    dec!(0.04),
                ),
                Tier::new(
                    "supermarkets",
                    Condition::CategoryContains(GROCERY_CATEGORIES),
                    dec!(0.04),
                ),
                Tier::new(
                    "flights",
                    Condition::CategoryContains(AIRLINE_CATEGORIES),
                    dec!(0.03),
                ),
            ],
            default_rate: dec!(0.01),
        },
    )
}

fn amex_blue_cash_everyday() -> RewardProgram {
    RewardProgram::new(
        AMEX_BLUE_CASH_EVERYDAY,
        ProgramKind::Capped {
            tiers: vec![Tier::new(
                "supermarkets",
                Condition::CategoryContains(GROCERY_CATEGORIES),
                dec!(0.03),
            )],
            default_rate: dec!(0.01),
            spend_cap: dec!(6000),
            reward_ceiling: None,
            period: CapPeriod::Annual,
        },
    )
}
