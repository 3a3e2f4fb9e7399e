pub mod audit;
pub mod login_attempt;
pub mod postgres_repository;
pub mod session;
pub mod user;
