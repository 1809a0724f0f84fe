mod server;

pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
pub mod ws;

pub use server::start_server;
pub use state::AppState;
