use crate::model::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "_id", alias = "id")]
    pub id: Id,
    pub owner_id: Id,
    pub title: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub title: String,
    pub amount: f64,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Partial update, only fields that are present get written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Expense {
    pub fn new(owner_id: &Id, input: ExpenseCreate) -> Expense {
        Expense {
            id: Id::new(),
            owner_id: owner_id.clone(),
            title: input.title,
            amount: input.amount,
            date: input.date,
            description: input.description,
            category: input.category,
        }
    }

    pub fn apply(&mut self, update: ExpenseUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
    }
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ExpenseUpdate::default()
    }
}

impl From<&Expense> for ExpenseUpdate {
    fn from(expense: &Expense) -> ExpenseUpdate {
        ExpenseUpdate {
            title: Some(expense.title.clone()),
            amount: Some(expense.amount),
            date: Some(expense.date),
            description: Some(expense.description.clone().unwrap_or_default()),
            category: Some(expense.category.clone().unwrap_or_default()),
        }
    }
}
