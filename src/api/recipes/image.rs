use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::recipes;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/image",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe image data"),
        (status = 404, description = "Recipe or image not found", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let row: (Option<Vec<u8>>, Option<String>) = match recipes::table
        .find(id)
        .select((recipes::image, recipes::image_content_type))
        .first(&mut conn)
    {
        Ok(r) => r,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch recipe image: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe image".to_string(),
                }),
            )
                .into_response();
        }
    };

    let (Some(data), Some(content_type)) = row else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe has no image".to_string(),
            }),
        )
            .into_response();
    };

    match axum::http::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(data))
    {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to build image response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe image".to_string(),
                }),
            )
                .into_response()
        }
    }
}
