pub mod config;
pub mod dto;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod security;
pub mod state;
pub mod utils;
