pub mod arguments;
pub mod config;
pub mod database;
pub mod errors;
pub mod logger;
pub mod paths;
pub mod readings;
pub mod webserver;
