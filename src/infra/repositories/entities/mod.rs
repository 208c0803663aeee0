//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod snippet;

#[allow(unused_imports)]
pub use snippet::{ActiveModel as SnippetActiveModel, Entity as SnippetEntity, Model as SnippetModel};
