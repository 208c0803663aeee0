//! Domain layer - Core business entities
//!
//! Domain models are independent of storage and transport concerns.

pub mod snippet;

pub use snippet::{NewSnippet, Snippet, SnippetList, SnippetResponse};
