use cashback::analysis::{OptimalCashbackReport, RewardSummary, SpendingSummary};
use cashback::error::AppError;
use cashback::rewards::RewardProgramRegistry;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn render_summary(summary: &RewardSummary, json: bool) -> Result<(), AppError> {
    let view = summary.view();
    if json {
        return print_json(&view);
    }

    println!("Cash back earned");
    println!(
        "- {} transactions | {} rewarded | {} on unrecognized accounts",
        view.total_transactions, view.matched_transactions, view.unmatched_transactions
    );
    println!(
        "- ${:.2} earned on ${:.2} of spend",
        view.total_cashback, view.total_spend
    );
    if !view.cashback_by_card.is_empty() {
        println!("By card:");
        for (card, cashback) in &view.cashback_by_card {
            let spend = view.spending_by_card.get(card).copied().unwrap_or_default();
            println!("  - {card}: ${cashback:.2} on ${spend:.2}");
        }
    }
    if !view.by_category.is_empty() {
        println!("By category:");
        for (category, breakdown) in &view.by_category {
            println!(
                "  - {category}: {} txns | ${:.2} spend | ${:.2} back",
                breakdown.count, breakdown.spend, breakdown.cashback
            );
        }
    }

    Ok(())
}

pub(crate) fn render_optimal(report: &OptimalCashbackReport, json: bool) -> Result<(), AppError> {
    let view = report.view();
    if json {
        return print_json(&view);
    }

    println!("Optimal card routing");
    println!(
        "- actual ${:.2} | optimal ${:.2} | +${:.2} ({:.1}%)",
        view.actual_total_cashback,
        view.optimal_total_cashback,
        view.potential_increase,
        view.improvement_percentage
    );
    if report.baseline_kept {
        println!("- cards already in use are the best routing for this feed");
    }
    if !view.optimal_cashback_by_card.is_empty() {
        println!("Optimal cash back by card:");
        for (card, cashback) in &view.optimal_cashback_by_card {
            let spend = view
                .optimal_spending_by_card
                .get(card)
                .copied()
                .unwrap_or_default();
            println!("  - {card}: ${cashback:.2} on ${spend:.2}");
        }
    }
    if view.top_improvement_opportunities.is_empty() {
        println!("No single transaction would have earned meaningfully more.");
    } else {
        println!("Top opportunities:");
        for entry in &view.top_improvement_opportunities {
            println!(
                "  - {} {} ${:.2}: {} ${:.2} -> {} ${:.2} (+${:.2})",
                entry.date,
                entry.merchant,
                entry.amount,
                entry.actual_card,
                entry.actual_cashback,
                entry.optimal_card,
                entry.optimal_cashback,
                entry.improvement
            );
        }
    }

    Ok(())
}

pub(crate) fn render_spending(summary: &SpendingSummary, json: bool) -> Result<(), AppError> {
    let view = summary.view();
    if json {
        return print_json(&view);
    }

    println!("Spending overview");
    println!(
        "- {} transactions | ${:.2} moved | ${:.2} in | ${:.2} out",
        view.total_transactions, view.total_amount, view.income, view.expenses
    );
    if view.faulted_transactions > 0 {
        println!("- {} transactions left out after overflow", view.faulted_transactions);
    }
    println!("Accounts:");
    for (account_id, account) in &view.accounts {
        println!(
            "  - {} ({}, {account_id}): {} txns | ${:.2}",
            account.name, account.institution, account.count, account.amount
        );
    }
    println!("Categories:");
    for (category, tally) in &view.categories {
        println!("  - {category}: {} txns | ${:.2}", tally.count, tally.amount);
    }

    Ok(())
}

pub(crate) fn render_programs(registry: &RewardProgramRegistry, json: bool) -> Result<(), AppError> {
    if json {
        let programs: Vec<_> = registry.iter().collect();
        return print_json(&programs);
    }

    println!("Registered reward programs ({})", registry.len());
    for program in registry {
        println!("- {}", program.name);
        for line in program.rule_lines() {
            println!("    {line}");
        }
    }

    Ok(())
}
