use super::Context;
use crate::{
    analytics::{self, BudgetStatus},
    chart::money,
    client::storage::BUDGET_KEY,
    filter::{self, ExpenseFilter},
    model::{Expense, ExpenseCreate, ExpenseUpdate, Id},
    output,
};
use anyhow::{anyhow, Context as _, Result};
use chrono::{DateTime, Utc};
use dialoguer::Confirm;

/// Raw input of the add and edit views.
#[derive(Clone, Debug, Default)]
pub struct ExpenseForm {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl ExpenseForm {
    pub fn into_create(self) -> Result<ExpenseCreate> {
        let title = self
            .title
            .filter(|it| !it.trim().is_empty())
            .ok_or_else(|| anyhow!("Title is required"))?;
        let amount = self.amount.ok_or_else(|| anyhow!("Amount is required"))?;
        let date = self.date.ok_or_else(|| anyhow!("Date is required"))?;

        if !amount.is_finite() {
            return Err(anyhow!("Amount must be a number"));
        }

        Ok(ExpenseCreate {
            title: title.trim().to_string(),
            amount,
            date,
            description: self.description.filter(|it| !it.trim().is_empty()),
            category: self.category.filter(|it| !it.trim().is_empty()),
        })
    }

    /// Full form of `current` with the provided fields replaced.
    pub fn overlay(self, current: &Expense) -> Result<ExpenseUpdate> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(anyhow!("Title is required"));
            }
        }

        let mut update = ExpenseUpdate::from(current);
        update.title = self.title.map(|it| it.trim().to_string()).or(update.title);
        update.amount = self.amount.or(update.amount);
        update.date = self.date.or(update.date);
        update.description = self.description.or(update.description);
        update.category = self.category.or(update.category);
        Ok(update)
    }
}

pub async fn list(ctx: &mut Context, filter: ExpenseFilter, skip: u32, limit: u32) -> Result<()> {
    let client = ctx.client()?;
    let expenses = match client.list_expenses(skip, limit).await {
        Ok(expenses) => expenses,
        Err(e) => return Err(ctx.request_failed(e, "Failed to load expenses")),
    };

    output::heading("All Expenses");

    let categories = filter::categories(&expenses);
    if !categories.is_empty() {
        println!("Categories: {}", categories.join(", "));
    }

    let filtered = filter.apply(&expenses);

    if let Some(budget) = ctx.storage.budget() {
        print_budget_status(analytics::budget_status(analytics::total(filtered.iter().copied()), budget));
    }

    if filtered.is_empty() {
        output::info("No expenses found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Title", "Amount (₹)", "Date", "Category"]);
    for expense in &filtered {
        table.add_row(vec![
            expense.id.to_string(),
            expense.title.clone(),
            money(expense.amount),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.category.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    if !filter.is_empty() {
        println!("Showing {} of {} expense(s)", filtered.len(), expenses.len());
    }
    println!(
        "{} expense(s), total {}",
        filtered.len(),
        money(analytics::total(filtered.iter().copied()))
    );
    Ok(())
}

pub async fn add(ctx: &Context, form: ExpenseForm) -> Result<()> {
    let input = form.into_create()?;
    let expense = ctx
        .client()?
        .create_expense(&input)
        .await
        .context("Failed to add expense")?;
    output::success(&format!("Added \"{}\" ({})", expense.title, expense.id));
    Ok(())
}

pub async fn edit(ctx: &Context, id: &Id, form: ExpenseForm) -> Result<()> {
    let client = ctx.client()?;
    let current = client.get_expense(id).await.context("Failed to load expense")?;
    let update = form.overlay(&current)?;
    let expense = client
        .update_expense(id, &update)
        .await
        .context("Failed to update expense")?;
    output::success(&format!("Saved \"{}\"", expense.title));
    Ok(())
}

pub async fn delete(ctx: &Context, id: &Id, yes: bool) -> Result<()> {
    let client = ctx.client()?;

    if !yes
        && !Confirm::new()
            .with_prompt("Delete this expense?")
            .default(false)
            .interact()?
    {
        output::info("Cancelled");
        return Ok(());
    }

    client.delete_expense(id).await.context("Failed to delete")?;
    output::success("Deleted");
    Ok(())
}

pub fn budget(ctx: &mut Context, amount: Option<String>, clear: bool) -> Result<()> {
    if clear {
        ctx.storage.remove_item(BUDGET_KEY)?;
        output::success("Monthly budget cleared");
        return Ok(());
    }

    match amount {
        Some(amount) => {
            let amount = amount.trim();
            let value = parse_budget(amount)?;
            ctx.storage.set_item(BUDGET_KEY, amount)?;
            output::success(&format!("Monthly budget set to {}", money(value)));
        }
        None => match ctx.storage.budget() {
            Some(budget) => output::info(&format!("Monthly budget: {}", money(budget))),
            None => output::info("No monthly budget set"),
        },
    }

    Ok(())
}

fn parse_budget(amount: &str) -> Result<f64> {
    amount
        .parse::<f64>()
        .ok()
        .filter(|it| it.is_finite() && *it >= 0.0)
        .ok_or_else(|| anyhow!("Invalid budget amount"))
}

pub fn budget_message(status: BudgetStatus) -> String {
    match status {
        BudgetStatus::Exceeded { spent, budget } => format!(
            "⚠️ You've exceeded your budget of {}. Total spending: {}",
            money(budget),
            money(spent)
        ),
        BudgetStatus::Within { spent, budget } => {
            format!("✅ Spent {} of {}", money(spent), money(budget))
        }
    }
}

fn print_budget_status(status: BudgetStatus) {
    match status {
        BudgetStatus::Exceeded { .. } => output::warning(&budget_message(status)),
        BudgetStatus::Within { .. } => output::success(&budget_message(status)),
    }
}

#[cfg(test)]
mod test {
    use super::{budget_message, parse_budget, ExpenseForm};
    use crate::{analytics::BudgetStatus, model::Id, test::expense};
    use chrono::{TimeZone, Utc};

    fn form() -> ExpenseForm {
        ExpenseForm {
            title: Some(" Groceries ".into()),
            amount: Some(500.0),
            date: Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()),
            description: Some("".into()),
            category: Some("Food".into()),
        }
    }

    #[test]
    fn create_from_complete_form() {
        let input = form().into_create().unwrap();
        assert_eq!("Groceries", input.title);
        assert_eq!(500.0, input.amount);
        assert_eq!(None, input.description);
        assert_eq!(Some("Food".to_string()), input.category);
    }

    #[test]
    fn create_requires_fields() {
        let missing_title = ExpenseForm {
            title: Some("  ".into()),
            ..form()
        };
        assert_eq!("Title is required", missing_title.into_create().unwrap_err().to_string());

        let missing_amount = ExpenseForm {
            amount: None,
            ..form()
        };
        assert_eq!("Amount is required", missing_amount.into_create().unwrap_err().to_string());

        let missing_date = ExpenseForm {
            date: None,
            ..form()
        };
        assert_eq!("Date is required", missing_date.into_create().unwrap_err().to_string());
    }

    #[test]
    fn overlay_replaces_only_given_fields() {
        let current = expense(&Id::new(), "Groceries", 500.0, "2024-03-05T10:00:00Z");
        let update = ExpenseForm {
            amount: Some(650.0),
            ..ExpenseForm::default()
        }
        .overlay(&current)
        .unwrap();
        assert_eq!(Some("Groceries".to_string()), update.title);
        assert_eq!(Some(650.0), update.amount);
        assert_eq!(Some(current.date), update.date);
        assert_eq!(Some("Food".to_string()), update.category);
        assert_eq!(Some("".to_string()), update.description);
    }

    #[test]
    fn overlay_rejects_blank_title() {
        let current = expense(&Id::new(), "Groceries", 500.0, "2024-03-05T10:00:00Z");
        let form = ExpenseForm {
            title: Some(" ".into()),
            ..ExpenseForm::default()
        };
        assert!(form.overlay(&current).is_err());
    }

    #[test]
    fn budget_amounts() {
        assert_eq!(2000.0, parse_budget("2000").unwrap());
        assert!(parse_budget("-1").is_err());
        assert!(parse_budget("abc").is_err());
        assert!(parse_budget("inf").is_err());
    }

    #[test]
    fn budget_messages() {
        assert_eq!(
            "✅ Spent ₹1500.00 of ₹2000.00",
            budget_message(BudgetStatus::Within {
                spent: 1500.0,
                budget: 2000.0
            })
        );
        assert_eq!(
            "⚠️ You've exceeded your budget of ₹2000.00. Total spending: ₹2500.00",
            budget_message(BudgetStatus::Exceeded {
                spent: 2500.0,
                budget: 2000.0
            })
        );
    }
}
