use crate::model::Expense;
use chrono::NaiveDate;

/// Narrows an expense list down by category and an inclusive date range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn is_empty(&self) -> bool {
        self == &ExpenseFilter::default()
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = &self.category {
            if expense.category.as_ref() != Some(category) {
                return false;
            }
        }

        let day = expense.date.date_naive();

        if let Some(from) = self.from {
            if day < from {
                return false;
            }
        }

        if let Some(to) = self.to {
            if day > to {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses.iter().filter(|it| self.matches(it)).collect()
    }
}

/// Distinct category labels in the order they first appear. Missing and
/// empty labels are skipped.
pub fn categories(expenses: &[Expense]) -> Vec<String> {
    let mut categories: Vec<String> = vec![];

    for category in expenses
        .iter()
        .filter_map(|it| it.category.as_ref())
        .filter(|it| !it.is_empty())
    {
        if !categories.contains(category) {
            categories.push(category.clone());
        }
    }

    categories
}

#[cfg(test)]
mod test {
    use super::{categories, ExpenseFilter};
    use crate::{
        model::{Expense, ExpenseUpdate, Id},
        test::expense,
    };
    use chrono::NaiveDate;

    fn expenses() -> Vec<Expense> {
        let owner = Id::new();
        let mut rent = expense(&owner, "Rent", 1200.0, "2024-02-01T09:00:00Z");
        rent.category = Some("Bills".into());
        let mut gift = expense(&owner, "Gift", 40.0, "2024-02-14T23:59:59Z");
        gift.category = None;
        vec![
            expense(&owner, "Groceries", 500.0, "2024-01-05T10:00:00Z"),
            rent,
            gift,
            expense(&owner, "Dinner", 60.0, "2024-03-01T00:00:00Z"),
        ]
    }

    fn titles(expenses: Vec<&Expense>) -> Vec<&str> {
        expenses.into_iter().map(|it| it.title.as_str()).collect()
    }

    fn date(s: &str) -> Option<NaiveDate> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let expenses = expenses();
        let filter = ExpenseFilter::default();
        assert!(filter.is_empty());
        assert_eq!(4, filter.apply(&expenses).len());
    }

    #[test]
    fn by_category() {
        let expenses = expenses();
        let filter = ExpenseFilter {
            category: Some("Food".into()),
            ..ExpenseFilter::default()
        };
        assert_eq!(vec!["Groceries", "Dinner"], titles(filter.apply(&expenses)));
    }

    #[test]
    fn date_range_is_inclusive() {
        let expenses = expenses();
        let filter = ExpenseFilter {
            from: date("2024-02-01"),
            to: date("2024-02-14"),
            ..ExpenseFilter::default()
        };
        assert_eq!(vec!["Rent", "Gift"], titles(filter.apply(&expenses)));
    }

    #[test]
    fn open_ended_ranges() {
        let expenses = expenses();
        let from = ExpenseFilter {
            from: date("2024-02-15"),
            ..ExpenseFilter::default()
        };
        assert_eq!(vec!["Dinner"], titles(from.apply(&expenses)));

        let to = ExpenseFilter {
            to: date("2024-01-31"),
            ..ExpenseFilter::default()
        };
        assert_eq!(vec!["Groceries"], titles(to.apply(&expenses)));
    }

    #[test]
    fn combined() {
        let expenses = expenses();
        let filter = ExpenseFilter {
            category: Some("Food".into()),
            from: date("2024-02-01"),
            to: None,
        };
        assert_eq!(vec!["Dinner"], titles(filter.apply(&expenses)));
    }

    #[test]
    fn edited_uncategorized_expense_adds_no_label() {
        let mut edited = expense(&Id::new(), "Gift", 40.0, "2024-02-14T12:00:00Z");
        edited.category = None;
        edited.apply(ExpenseUpdate::from(&edited.clone()));
        assert_eq!(Some(String::new()), edited.category);
        assert!(categories(&[edited]).is_empty());
    }

    #[test]
    fn distinct_categories_in_first_seen_order() {
        assert_eq!(vec!["Food", "Bills"], categories(&expenses()));
        assert!(categories(&[]).is_empty());
    }
}
