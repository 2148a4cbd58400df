use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::rewards::{
    catalog, CapPeriod, Condition, ProgramKind, RewardProgram, RewardProgramRegistry, Tier,
};
use crate::transactions::{AccountInfo, Transaction, OTHER_CHANNEL};

pub(super) const DINING_CARD: &str = "Dining Rewards";
pub(super) const FLAT_CARD: &str = "Flat Cash";

/// Spend of `spend` dollars, stored with the outflow sign.
pub(super) fn purchase(
    id: &str,
    account_id: &str,
    spend: Decimal,
    category: &str,
    merchant: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        account_id: account_id.to_string(),
        date: "2025-05-12".to_string(),
        name: merchant.to_string(),
        merchant_name: Some(merchant.to_string()),
        amount: -spend,
        category: category.to_string(),
        payment_channel: OTHER_CHANNEL.to_string(),
    }
}

pub(super) fn dated(transaction: Transaction, date: &str) -> Transaction {
    Transaction {
        date: date.to_string(),
        ..transaction
    }
}

pub(super) fn refund(id: &str, account_id: &str, amount: Decimal) -> Transaction {
    Transaction {
        amount,
        ..purchase(id, account_id, Decimal::ZERO, "Shops", "Refund")
    }
}

pub(super) fn directory(entries: &[(&str, &str, &str)]) -> HashMap<String, AccountInfo> {
    entries
        .iter()
        .map(|(id, account, institution)| (id.to_string(), AccountInfo::new(*account, *institution)))
        .collect()
}

pub(super) fn flat(name: &str, rate: Decimal) -> RewardProgram {
    RewardProgram::new(name, ProgramKind::FlatRate { rate })
}

pub(super) fn dining_card() -> RewardProgram {
    RewardProgram::new(
        DINING_CARD,
        ProgramKind::Tiered {
            tiers: vec![Tier::new(
                "dining",
                Condition::CategoryContains(&["Food and Drink", "Restaurants"]),
                dec!(0.03),
            )],
            default_rate: dec!(0.01),
        },
    )
}

pub(super) fn quarterly_grocery_card(name: &str, rate: Decimal, cap: Decimal) -> RewardProgram {
    RewardProgram::new(
        name,
        ProgramKind::Capped {
            tiers: vec![Tier::new(
                "groceries",
                Condition::CategoryContains(&["Groceries"]),
                rate,
            )],
            default_rate: dec!(0.01),
            spend_cap: cap,
            reward_ceiling: None,
            period: CapPeriod::Quarterly,
        },
    )
}

/// Dining at 3% and a 1.5% flat card, matched through their account names.
pub(super) fn two_card_registry() -> RewardProgramRegistry {
    RewardProgramRegistry::new(vec![dining_card(), flat(FLAT_CARD, dec!(0.015))])
        .expect("valid registry")
}

pub(super) fn two_card_directory() -> HashMap<String, AccountInfo> {
    directory(&[
        ("acc-dining", "Dining Rewards Visa", "Local Credit Union"),
        ("acc-flat", "Flat Cash Mastercard", "Local Credit Union"),
    ])
}

/// Program whose rate overflows on the largest representable amounts.
pub(super) fn overflowing_program(name: &str) -> RewardProgram {
    flat(name, dec!(2))
}

/// Registry holding only the shared-cap choice-category card, and an account
/// that resolves to it by name.
pub(super) fn customized_cash_only() -> (RewardProgramRegistry, HashMap<String, AccountInfo>) {
    let program = RewardProgramRegistry::standard()
        .get(catalog::BOFA_CUSTOMIZED_CASH)
        .cloned()
        .expect("catalog program");
    let registry = RewardProgramRegistry::new(vec![program]).expect("registry");
    let directory = directory(&[(
        "acc",
        "Bank of America Customized Cash Rewards Visa",
        "Bank of America",
    )]);
    (registry, directory)
}

/// The same quarter's spend listed newest first, as feeds arrive. Oldest
/// first, gas fills the 2500 cap at 3% and groceries earn 1%.
pub(super) fn newest_first_quarter() -> Vec<Transaction> {
    vec![
        dated(
            purchase("late-grocery", "acc", dec!(1000), "Groceries", "Safeway"),
            "2025-04-30",
        ),
        dated(
            purchase("early-gas", "acc", dec!(2500), "Gas", "Shell"),
            "2025-04-01",
        ),
    ]
}

/// Half the representable range plus one, so two of them overflow a sum.
pub(super) fn half_max_plus_one() -> Decimal {
    Decimal::MAX / dec!(2) + Decimal::ONE
}
