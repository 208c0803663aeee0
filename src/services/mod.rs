//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod snippet_service;

pub use snippet_service::{Clock, SnippetManager, SnippetService};

#[cfg(any(test, feature = "test-utils"))]
pub use snippet_service::MockSnippetService;
