pub mod get;
pub mod list;

use crate::AppState;
use axum::routing::get as get_method;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/ingredients endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ingredients", get_method(list::list_ingredients))
        .route("/api/ingredients/{id}", get_method(get::get_ingredient))
}

#[derive(OpenApi)]
#[openapi(paths(list::list_ingredients, get::get_ingredient))]
pub struct ApiDoc;
