//! Custom request extractors.

mod path_id;
mod query;
mod validated_json;

pub use path_id::PositiveId;
pub use query::ValidQuery;
pub use validated_json::ValidatedJson;
