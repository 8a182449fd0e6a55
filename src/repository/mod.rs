pub mod auth_token;
pub use auth_token::AuthTokenRepository;
pub mod expense;
pub use expense::ExpenseRepository;
pub mod user;
pub use user::UserRepository;
