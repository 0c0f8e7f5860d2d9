use crate::api::users::view::avatar_url;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::images::decode_data_url;
use crate::schema::users;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// Base64 data-URL image (`data:image/png;base64,...`)
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar",
    tag = "users",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar replaced", body = AvatarResponse),
        (status = 400, description = "Invalid image payload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn put_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<AvatarRequest>,
) -> impl IntoResponse {
    let decoded = match decode_data_url(&req.avatar) {
        Ok(d) => d,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
                .into_response()
        }
    };

    let mut conn = get_conn!(pool);

    match diesel::update(users::table.find(user.id))
        .set((
            users::avatar.eq(Some(decoded.data.as_slice())),
            users::avatar_content_type.eq(Some(decoded.content_type.as_str())),
        ))
        .execute(&mut conn)
    {
        Ok(_) => {
            let url = avatar_url(user.id, true).unwrap_or_default();
            (StatusCode::OK, Json(AvatarResponse { avatar: url })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update avatar: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update avatar".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar",
    tag = "users",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match diesel::update(users::table.find(user.id))
        .set((
            users::avatar.eq(None::<Vec<u8>>),
            users::avatar_content_type.eq(None::<String>),
        ))
        .execute(&mut conn)
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to delete avatar: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete avatar".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/avatar",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Avatar image data"),
        (status = 404, description = "User or avatar not found", body = ErrorResponse)
    )
)]
pub async fn get_avatar(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let row: (Option<Vec<u8>>, Option<String>) = match users::table
        .find(id)
        .select((users::avatar, users::avatar_content_type))
        .first(&mut conn)
    {
        Ok(r) => r,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "User not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch avatar: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch avatar".to_string(),
                }),
            )
                .into_response();
        }
    };

    let (Some(data), Some(content_type)) = row else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "User has no avatar".to_string(),
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
            tracing::error!("Failed to build avatar response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch avatar".to_string(),
                }),
            )
                .into_response()
        }
    }
}
