//! Shared types.

mod pagination;
mod response;

pub use pagination::{Pagination, PaginationParams};
pub use response::{Created, NoContent};
