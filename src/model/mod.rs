mod api_error;
pub use api_error::ApiError;
mod api_result;
pub use api_result::ApiResult;
mod auth_token;
pub use auth_token::AuthToken;
mod expense;
pub use expense::{Expense, ExpenseCreate, ExpenseUpdate};
mod id;
pub use id::Id;
mod user;
pub use user::{User, UserView};
