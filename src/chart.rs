//! Plain-text charts for the terminal.

use crate::analytics::BudgetComparison;

pub const WIDTH: usize = 40;

const FULL: char = '█';
const LIGHT: char = '░';

pub fn money(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

/// Bar of `value` scaled against `max`. Any positive value gets at least one cell.
pub fn bar(value: f64, max: f64, width: usize, fill: char) -> String {
    if value <= 0.0 || max <= 0.0 || !value.is_finite() || !max.is_finite() {
        return String::new();
    }

    let cells = ((value / max).min(1.0) * width as f64).round() as usize;
    std::iter::repeat(fill).take(cells.max(1)).collect()
}

/// One labelled horizontal bar per row, scaled to the largest value.
pub fn bar_chart(rows: &[(String, f64)], width: usize) -> Vec<String> {
    let max = max_of(rows.iter().map(|(_, value)| *value));
    let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|(label, value)| {
            format!(
                "{:<lw$}  {:<bw$}  {}",
                label,
                bar(*value, max, width, FULL),
                money(*value),
                lw = label_width,
                bw = width
            )
        })
        .collect()
}

/// Share of the total per row, in percent.
pub fn shares(rows: &[(String, f64)]) -> Vec<(String, f64, f64)> {
    let total: f64 = rows.iter().map(|(_, value)| value).sum();

    rows.iter()
        .map(|(label, value)| {
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            (label.clone(), *value, share)
        })
        .collect()
}

/// Budget and actual bars per month, both scaled to the same maximum.
pub fn budget_chart(rows: &[BudgetComparison], width: usize) -> Vec<String> {
    let max = max_of(rows.iter().flat_map(|it| vec![it.budget, it.actual]));
    let mut lines = vec![];

    for row in rows {
        lines.push(format!(
            "{}  budget  {:<bw$}  {}",
            row.month,
            bar(row.budget, max, width, LIGHT),
            money(row.budget),
            bw = width
        ));
        lines.push(format!(
            "{}  actual  {:<bw$}  {}",
            " ".repeat(row.month.chars().count()),
            bar(row.actual, max, width, FULL),
            money(row.actual),
            bw = width
        ));
    }

    lines
}

fn max_of<I: Iterator<Item = f64>>(values: I) -> f64 {
    values.fold(0.0, f64::max)
}
