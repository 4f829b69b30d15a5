use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Path the OpenAPI document is served from.
pub const OPENAPI_PATH: &str = "/docs/openapi.json";

/// Swagger UI at `/docs` for the control, stream and sensor routes.
pub fn router() -> Router<SharedState> {
    SwaggerUi::new("/docs")
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}
