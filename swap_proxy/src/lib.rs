pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod prices;
pub mod router;
pub mod routers;
pub mod state;
#[cfg(test)]
pub mod tests;
pub mod utils;
