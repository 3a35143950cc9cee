pub mod app;
pub mod auth;
pub mod balance;
pub mod config;
pub mod error;
pub mod pagination;
pub mod state;
pub mod transactions;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;
