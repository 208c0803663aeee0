//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::snippet_handler;
use crate::domain::{SnippetList, SnippetResponse};
use crate::types::Pagination;

/// OpenAPI documentation for the Snippets API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Snippets API",
        version = "0.1.0",
        description = "Starter REST service storing short-lived text snippets",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:4040", description = "Local development server")
    ),
    paths(
        snippet_handler::list_snippets,
        snippet_handler::create_snippet,
        snippet_handler::get_snippet,
        snippet_handler::delete_snippet,
    ),
    components(
        schemas(
            SnippetResponse,
            SnippetList,
            Pagination,
            snippet_handler::CreateSnippetRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Snippets", description = "Snippet management operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for static bearer tokens
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("API token configured with --token / API_TOKEN"))
                        .build(),
                ),
            );
        }
    }
}
