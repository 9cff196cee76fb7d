pub mod client;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod node;
pub mod routes;
pub mod utils;
