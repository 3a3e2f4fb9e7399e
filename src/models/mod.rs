pub mod audit;
pub mod session;
pub mod user;
