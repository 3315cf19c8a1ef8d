pub mod config;
pub mod fetch_error;
pub mod fetcher;
pub mod models;
pub mod scheduler;
pub mod transport;
