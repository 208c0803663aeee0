//! HTTP request handlers.

pub mod snippet_handler;

pub use snippet_handler::snippet_routes;
