use super::catalog::{
    AMEX_GOLD, BOFA_CASH_REWARDS, CHASE_SAPPHIRE_PREFERRED, CITI_DOUBLE_CASH,
    WELLS_FARGO_ACTIVE_CASH,
};
use super::program::RewardProgram;
use super::registry::RewardProgramRegistry;
use crate::transactions::{AccountDirectory, AccountInfo};

/// Issuer keyword to program, consulted top to bottom.
///
/// `citi` after `citibank` is redundant for matching but keeps the table
/// readable as one row per spelling the aggregator uses.
pub const ISSUER_KEYWORDS: &[(&str, &str)] = &[
    ("bank of america", BOFA_CASH_REWARDS),
    ("chase", CHASE_SAPPHIRE_PREFERRED),
    ("american express", AMEX_GOLD),
    ("amex", AMEX_GOLD),
    ("wells fargo", WELLS_FARGO_ACTIVE_CASH),
    ("citibank", CITI_DOUBLE_CASH),
    ("citi", CITI_DOUBLE_CASH),
];

/// Resolves the card a user actually holds from account display metadata.
#[derive(Debug, Clone, Copy)]
pub struct InstitutionMatcher<'a> {
    registry: &'a RewardProgramRegistry,
    keywords: &'a [(&'a str, &'a str)],
}

impl<'a> InstitutionMatcher<'a> {
    pub fn new(registry: &'a RewardProgramRegistry) -> Self {
        Self::with_keywords(registry, ISSUER_KEYWORDS)
    }

    pub fn with_keywords(
        registry: &'a RewardProgramRegistry,
        keywords: &'a [(&'a str, &'a str)],
    ) -> Self {
        Self { registry, keywords }
    }

    /// First issuer keyword found in either name wins. Keywords pointing at a
    /// program the registry lacks are passed over. Without a keyword hit, the
    /// first registered program whose own name appears in either name is used.
    pub fn match_program(
        &self,
        institution_name: &str,
        account_name: &str,
    ) -> Option<&'a RewardProgram> {
        let institution = institution_name.to_lowercase();
        let account = account_name.to_lowercase();
        let mentions = |needle: &str| {
            let needle = needle.to_lowercase();
            !needle.is_empty() && (institution.contains(&needle) || account.contains(&needle))
        };

        let by_issuer = self
            .keywords
            .iter()
            .filter(|entry| mentions(entry.0))
            .find_map(|entry| self.registry.get(entry.1));
        if by_issuer.is_some() {
            return by_issuer;
        }

        self.registry.iter().find(|program| mentions(&program.name))
    }

    /// Directory lookup followed by [`Self::match_program`]. Accounts missing
    /// from the directory resolve to nothing.
    pub fn match_account<'d, D>(
        &self,
        directory: &'d D,
        account_id: &str,
    ) -> Option<(&'a RewardProgram, &'d AccountInfo)>
    where
        D: AccountDirectory + ?Sized,
    {
        let info = directory.lookup(account_id)?;
        self.match_program(&info.institution_name, &info.account_name)
            .map(|program| (program, info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::catalog::{APPLE_CARD, DISCOVER_IT_STUDENT};
    use std::collections::HashMap;

    fn matched(institution: &str, account: &str) -> Option<String> {
        let registry = RewardProgramRegistry::standard();
        InstitutionMatcher::new(&registry)
            .match_program(institution, account)
            .map(|program| program.name.clone())
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(
            matched("CHASE BANK", "Checking"),
            matched("chase bank", "Checking")
        );
        assert_eq!(
            matched("chase bank", "Checking").as_deref(),
            Some(CHASE_SAPPHIRE_PREFERRED)
        );
    }

    #[test]
    fn account_name_is_searched_too() {
        assert_eq!(
            matched("Plaid Bank", "Amex Platinum ...1004").as_deref(),
            Some(AMEX_GOLD)
        );
        assert_eq!(
            matched("Financial Institution", "Wells Fargo Visa").as_deref(),
            Some(WELLS_FARGO_ACTIVE_CASH)
        );
    }

    #[test]
    fn table_priority_decides_overlapping_names() {
        // Both "bank of america" and "chase" appear; the earlier row wins.
        assert_eq!(
            matched("Chase", "Bank of America Premium Rewards").as_deref(),
            Some(BOFA_CASH_REWARDS)
        );
        assert_eq!(
            matched("Citizens Chase Partners", "").as_deref(),
            Some(CHASE_SAPPHIRE_PREFERRED)
        );
    }

    #[test]
    fn falls_back_to_program_name() {
        assert_eq!(
            matched("Apple", "Apple Card").as_deref(),
            Some(APPLE_CARD)
        );
        assert_eq!(
            matched("Discover", "discover it student cash back").as_deref(),
            Some(DISCOVER_IT_STUDENT)
        );
    }

    #[test]
    fn unknown_institution_matches_nothing() {
        assert_eq!(matched("First Platypus Credit Union", "Savings"), None);
        assert_eq!(matched("", ""), None);
    }

    #[test]
    fn keyword_for_unregistered_program_is_skipped() {
        let registry = RewardProgramRegistry::standard();
        let table = [("chase", "Chase Freedom Unlimited"), ("chase", APPLE_CARD)];
        let matcher = InstitutionMatcher::with_keywords(&registry, &table);
        let program = matcher
            .match_program("JPMorgan Chase", "Checking")
            .expect("second row resolves");
        assert_eq!(program.name, APPLE_CARD);
    }

    #[test]
    fn match_account_uses_directory() {
        let registry = RewardProgramRegistry::standard();
        let matcher = InstitutionMatcher::new(&registry);
        let mut directory = HashMap::new();
        directory.insert(
            "acc-1".to_string(),
            AccountInfo::new("Citi Double Cash Card", "Citibank Online"),
        );

        let (program, info) = matcher
            .match_account(&directory, "acc-1")
            .expect("account resolves");
        assert_eq!(program.name, CITI_DOUBLE_CASH);
        assert_eq!(info.institution_name, "Citibank Online");
        assert!(matcher.match_account(&directory, "acc-404").is_none());
    }
}
