pub mod accounts;
pub mod auction;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod listing;
pub mod logging;
pub mod state;
pub mod store;
pub mod wiki;
