pub mod cli_args;
pub mod error;
mod extractor;
mod middleware;
mod openapi;
pub mod route;
pub mod server;
pub mod state;
pub mod store;
