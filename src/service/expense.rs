use crate::{
    model::{Expense, ExpenseCreate, ExpenseUpdate, Id, User},
    repository::ExpenseRepository,
};
use anyhow::Result;
use tracing::info;

pub fn create(input: ExpenseCreate, owner: &User, repo: &ExpenseRepository) -> Result<Expense> {
    let expense = Expense::new(&owner.id, input);
    repo.insert(&expense)?;
    info!(id = %expense.id, owner = %owner.id, "Created expense");
    Ok(expense)
}

pub fn get(id: &Id, owner: &User, repo: &ExpenseRepository) -> Result<Option<Expense>> {
    repo.select_by_id(id, &owner.id)
}

pub fn list(owner: &User, skip: u32, limit: u32, repo: &ExpenseRepository) -> Result<Vec<Expense>> {
    repo.select_by_owner(&owner.id, skip, limit)
}

pub fn update(
    id: &Id,
    input: ExpenseUpdate,
    owner: &User,
    repo: &ExpenseRepository,
) -> Result<Option<Expense>> {
    let mut expense = match repo.select_by_id(id, &owner.id)? {
        Some(expense) => expense,
        None => return Ok(None),
    };

    if input.is_empty() {
        return Ok(Some(expense));
    }

    expense.apply(input);

    if !repo.update(&expense)? {
        return Ok(None);
    }

    info!(%id, owner = %owner.id, "Updated expense");
    Ok(Some(expense))
}

pub fn delete(id: &Id, owner: &User, repo: &ExpenseRepository) -> Result<bool> {
    let deleted = repo.delete(id, &owner.id)?;
    if deleted {
        info!(%id, owner = %owner.id, "Deleted expense");
    }
    Ok(deleted)
}
