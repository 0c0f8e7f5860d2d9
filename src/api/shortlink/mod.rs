pub mod redirect;

use crate::AppState;
use axum::routing::get as get_method;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for short-link redirects
pub fn router() -> Router<AppState> {
    Router::new().route("/s/{hash}", get_method(redirect::redirect))
}

#[derive(OpenApi)]
#[openapi(paths(redirect::redirect))]
pub struct ApiDoc;
