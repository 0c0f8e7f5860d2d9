use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::short_links;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/s/{hash}",
    tag = "shortlink",
    params(
        ("hash" = String, Path, description = "Short-link token")
    ),
    responses(
        (status = 307, description = "Redirect to the original URL"),
        (status = 404, description = "Unknown short link", body = ErrorResponse)
    )
)]
pub async fn redirect(
    State(pool): State<Arc<DbPool>>,
    Path(hash): Path<String>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match short_links::table
        .filter(short_links::url_hash.eq(&hash))
        .select(short_links::original_url)
        .first::<String>(&mut conn)
    {
        Ok(original_url) => Redirect::temporary(&original_url).into_response(),
        Err(diesel::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Unknown short link".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to resolve short link: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to resolve short link".to_string(),
                }),
            )
                .into_response()
        }
    }
}
