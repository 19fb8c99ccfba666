pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod templates;
pub mod utils;

pub use routes::create_routes;
pub use state::AppState;
