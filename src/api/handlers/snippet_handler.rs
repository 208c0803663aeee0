//! Snippet handlers.

use std::borrow::Cow;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::{PositiveId, ValidQuery, ValidatedJson};
use crate::api::AppState;
use crate::config::MAX_EXPIRY_DAYS;
use crate::domain::{NewSnippet, SnippetList, SnippetResponse};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, NoContent, PaginationParams};

/// Snippet creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSnippetRequest {
    #[validate(length(min = 1, max = 100, message = "the length must be between 1 and 100"))]
    #[schema(example = "Snippet #100", min_length = 1, max_length = 100)]
    pub title: String,
    #[validate(length(min = 1, max = 10000, message = "the length must be between 1 and 10000"))]
    #[schema(example = "Very important text", min_length = 1, max_length = 10000)]
    pub content: String,
    /// RFC 3339 timestamp between now and one year from now
    #[validate(custom(function = "validate_expires_at"))]
    #[schema(example = "2030-01-01T00:00:00Z")]
    pub expires_at: String,
}

impl CreateSnippetRequest {
    fn into_new_snippet(self) -> AppResult<NewSnippet> {
        let expires_at = parse_rfc3339(&self.expires_at)
            .ok_or_else(|| AppError::validation("expires_at: must be a valid RFC3339 date"))?;

        Ok(NewSnippet {
            title: self.title,
            content: self.content,
            expires_at,
        })
    }
}

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn validate_expires_at(value: &str) -> Result<(), ValidationError> {
    let now = Utc::now();
    let latest = now + Duration::days(MAX_EXPIRY_DAYS);

    match parse_rfc3339(value) {
        Some(at) if at >= now && at <= latest => Ok(()),
        _ => {
            let mut err = ValidationError::new("range");
            err.message = Some(Cow::Owned(format!(
                "expires_at ({}) must be a valid RFC3339 date within range from now ({}) to now + 1 year ({})",
                value,
                now.to_rfc3339_opts(SecondsFormat::Secs, true),
                latest.to_rfc3339_opts(SecondsFormat::Secs, true),
            )));
            Err(err)
        }
    }
}

/// Create snippet routes
pub fn snippet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_snippets)
                .post(create_snippet)
                .fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(get_snippet)
                .delete(delete_snippet)
                .fallback(method_not_allowed),
        )
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// List active snippets, newest first
#[utoipa::path(
    get,
    path = "/v1/snippets",
    tag = "Snippets",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of snippets", body = SnippetList),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_snippets(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> AppResult<Json<SnippetList>> {
    let params = params.check()?;
    let (snippets, pagination) = state
        .snippet_service
        .list(params.limit, params.offset)
        .await?;

    Ok(Json(SnippetList::new(snippets, pagination)))
}

/// Create a snippet
#[utoipa::path(
    post,
    path = "/v1/snippets",
    tag = "Snippets",
    request_body = CreateSnippetRequest,
    responses(
        (status = 201, description = "Snippet created", body = SnippetResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_snippet(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSnippetRequest>,
) -> AppResult<Created<SnippetResponse>> {
    let snippet = state
        .snippet_service
        .create(payload.into_new_snippet()?)
        .await?;

    Ok(Created(SnippetResponse::from(snippet)))
}

/// Get snippet by ID
#[utoipa::path(
    get,
    path = "/v1/snippets/{id}",
    tag = "Snippets",
    params(("id" = i32, Path, description = "Snippet ID, a positive integer")),
    responses(
        (status = 200, description = "Snippet found", body = SnippetResponse),
        (status = 400, description = "Invalid ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Snippet not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_snippet(
    State(state): State<AppState>,
    PositiveId(id): PositiveId,
) -> AppResult<Json<SnippetResponse>> {
    let snippet = state.snippet_service.get(id).await?;
    Ok(Json(SnippetResponse::from(snippet)))
}

/// Soft delete snippet
#[utoipa::path(
    delete,
    path = "/v1/snippets/{id}",
    tag = "Snippets",
    params(("id" = i32, Path, description = "Snippet ID, a positive integer")),
    responses(
        (status = 204, description = "Snippet deleted"),
        (status = 400, description = "Invalid ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Snippet not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_snippet(
    State(state): State<AppState>,
    PositiveId(id): PositiveId,
) -> AppResult<NoContent> {
    state.snippet_service.soft_delete(id).await?;
    Ok(NoContent)
}
