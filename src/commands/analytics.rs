use super::Context;
use crate::{
    analytics,
    chart::{self, money},
    output,
};
use anyhow::{Context as _, Result};
use std::{fs, path::Path};
use tracing::info;

pub async fn run(ctx: &mut Context, limit: u32, export: Option<&Path>) -> Result<()> {
    let client = ctx.client()?;
    let expenses = match client.list_expenses(0, limit).await {
        Ok(expenses) => expenses,
        Err(e) => return Err(ctx.request_failed(e, "Failed to load expenses")),
    };

    if let Some(path) = export {
        match analytics::to_csv(&expenses)? {
            Some(csv) => {
                fs::write(path, csv).with_context(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), rows = expenses.len(), "Exported expenses");
                output::success(&format!("Exported {} expense(s) to {}", expenses.len(), path.display()));
            }
            None => output::warning("No expenses to export"),
        }
    }

    output::heading("Analytics Dashboard");

    if expenses.is_empty() {
        output::info("No expenses found.");
        return Ok(());
    }

    let categories = analytics::by_category(&expenses);

    output::heading("Total Spending by Category");
    let mut table = output::create_table();
    table.set_header(vec!["Category", "Amount (₹)", "Share"]);
    for (label, amount, share) in chart::shares(&categories) {
        table.add_row(vec![label, money(amount), format!("{:.1}%", share)]);
    }
    println!("{}", table);

    output::heading("Category-wise Breakdown");
    for line in chart::bar_chart(&categories, chart::WIDTH) {
        println!("{}", line);
    }

    output::heading("Monthly Spending Trend");
    for line in chart::bar_chart(&analytics::by_month(&expenses), chart::WIDTH) {
        println!("{}", line);
    }

    let budget = ctx.storage.budget();
    output::heading("Budget vs Actual Spending");
    for line in chart::budget_chart(&analytics::budget_vs_actual(&expenses, budget), chart::WIDTH) {
        println!("{}", line);
    }
    output::warning(&format!("Budget: {} (per month)", money(budget.unwrap_or(0.0))));

    Ok(())
}
