//! Aggregations behind the analytics dashboard and the budget banner.

use crate::model::Expense;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

pub const UNCATEGORIZED: &str = "uncategorized";
pub const CSV_FILE_NAME: &str = "expenses_analytics.csv";

const CSV_HEADER: [&str; 7] = [
    "_id",
    "owner_id",
    "title",
    "amount",
    "date",
    "description",
    "category",
];

#[derive(Clone, Debug, PartialEq)]
pub struct BudgetComparison {
    pub month: String,
    pub budget: f64,
    pub actual: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BudgetStatus {
    Within { spent: f64, budget: f64 },
    Exceeded { spent: f64, budget: f64 },
}

pub fn total<'a, I>(expenses: I) -> f64
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses.into_iter().map(|it| it.amount).sum()
}

/// Spending per category in first-seen order. Missing and empty labels count
/// as [`UNCATEGORIZED`].
pub fn by_category(expenses: &[Expense]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = vec![];

    for expense in expenses {
        let label = match expense.category.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => UNCATEGORIZED,
        };

        match totals.iter_mut().find(|(it, _)| it == label) {
            Some((_, sum)) => *sum += expense.amount,
            None => totals.push((label.to_string(), expense.amount)),
        }
    }

    totals
}

/// Spending per UTC calendar month (`YYYY-MM`), oldest first.
pub fn by_month(expenses: &[Expense]) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for expense in expenses {
        *totals
            .entry(expense.date.format("%Y-%m").to_string())
            .or_insert(0.0) += expense.amount;
    }

    totals.into_iter().collect()
}

pub fn budget_vs_actual(expenses: &[Expense], budget: Option<f64>) -> Vec<BudgetComparison> {
    let budget = budget.unwrap_or(0.0);

    by_month(expenses)
        .into_iter()
        .map(|(month, actual)| BudgetComparison {
            month,
            budget,
            actual,
        })
        .collect()
}

pub fn budget_status(spent: f64, budget: f64) -> BudgetStatus {
    if spent > budget {
        BudgetStatus::Exceeded { spent, budget }
    } else {
        BudgetStatus::Within { spent, budget }
    }
}

/// Renders expenses as CSV where each value is JSON encoded. `None` when
/// there is nothing to export.
pub fn to_csv(expenses: &[Expense]) -> Result<Option<String>> {
    if expenses.is_empty() {
        return Ok(None);
    }

    let mut lines = vec![CSV_HEADER.join(",")];

    for expense in expenses {
        let values = [
            cell(&expense.id)?,
            cell(&expense.owner_id)?,
            cell(&expense.title)?,
            cell(&expense.amount)?,
            cell(&expense.date)?,
            cell(&expense.description)?,
            cell(&expense.category)?,
        ];
        lines.push(values.join(","));
    }

    Ok(Some(lines.join("\r\n")))
}

fn cell<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    if json == "null" {
        Ok("\"\"".into())
    } else {
        Ok(json)
    }
}
