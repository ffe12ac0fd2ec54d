// Library crate; the binary in main.rs and the integration tests build on it.

pub mod config;
pub mod detail;
pub mod error;
pub mod export;
pub mod format;
pub mod jsonp;
pub mod loader;
pub mod logging;
pub mod model;
pub mod render;
pub mod routes;
pub mod selection;
pub mod server;
pub mod source;
pub mod state;
pub mod store;
