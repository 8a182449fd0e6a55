use crate::{
    model::{ApiError, ApiResult, Expense, ExpenseCreate, ExpenseUpdate, Id, User},
    repository::ExpenseRepository,
    service::{blocking, expense},
};
use rocket::{get, http::Status, post, put, serde::json::Json, State};

const NOT_FOUND: &str = "Expense not found";
const DEFAULT_LIMIT: u32 = 100;

#[post("/expenses", data = "<input>")]
pub async fn post(
    input: Json<ExpenseCreate>,
    user: User,
    repo: &State<ExpenseRepository>,
) -> ApiResult<Expense> {
    let input = input.into_inner();

    if input.title.trim().is_empty() {
        return title_required();
    }

    let repo = repo.inner().clone();
    match blocking(move || expense::create(input, &user, &repo)).await {
        Ok(expense) => ApiResult::created(expense),
        Err(e) => e.into(),
    }
}

#[get("/expenses?<skip>&<limit>")]
pub async fn list(
    skip: Option<u32>,
    limit: Option<u32>,
    user: User,
    repo: &State<ExpenseRepository>,
) -> ApiResult<Vec<Expense>> {
    let skip = skip.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    let repo = repo.inner().clone();
    match blocking(move || expense::list(&user, skip, limit, &repo)).await {
        Ok(expenses) => ApiResult::ok(expenses),
        Err(e) => e.into(),
    }
}

#[get("/expenses/<id>")]
pub async fn get(id: Option<Id>, user: User, repo: &State<ExpenseRepository>) -> ApiResult<Expense> {
    let id = match id {
        Some(id) => id,
        None => return not_found(),
    };

    let repo = repo.inner().clone();
    ApiResult::new(blocking(move || expense::get(&id, &user, &repo)).await, NOT_FOUND)
}

#[put("/expenses/<id>", data = "<input>")]
pub async fn put(
    id: Option<Id>,
    input: Json<ExpenseUpdate>,
    user: User,
    repo: &State<ExpenseRepository>,
) -> ApiResult<Expense> {
    let id = match id {
        Some(id) => id,
        None => return not_found(),
    };

    let input = input.into_inner();

    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return title_required();
        }
    }

    let repo = repo.inner().clone();
    ApiResult::new(
        blocking(move || expense::update(&id, input, &user, &repo)).await,
        NOT_FOUND,
    )
}

#[rocket::delete("/expenses/<id>")]
pub async fn delete(id: Option<Id>, user: User, repo: &State<ExpenseRepository>) -> ApiResult<()> {
    let id = match id {
        Some(id) => id,
        None => return not_found(),
    };

    let repo = repo.inner().clone();
    match blocking(move || expense::delete(&id, &user, &repo)).await {
        Ok(true) => ApiResult::NoContent,
        Ok(false) => not_found(),
        Err(e) => e.into(),
    }
}

fn not_found<T>() -> ApiResult<T> {
    ApiError::new(Status::NotFound, NOT_FOUND).into()
}

fn title_required<T>() -> ApiResult<T> {
    ApiError::new(Status::UnprocessableEntity, "Title is required").into()
}
