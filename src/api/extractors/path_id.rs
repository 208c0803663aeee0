//! Positive integer path parameter.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::errors::AppError;

/// Resource ID taken from the single path parameter of the route.
///
/// Anything that is not a positive 32-bit integer is a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for PositiveId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        parse_id(&raw).map(PositiveId)
    }
}

fn parse_id(raw: &str) -> Result<i32, AppError> {
    let id: i32 = raw
        .parse()
        .map_err(|_| AppError::bad_request(format!("invalid id param: {:?}", raw)))?;

    if id <= 0 {
        return Err(AppError::bad_request(format!("invalid id param: {}", id)));
    }
    Ok(id)
}
