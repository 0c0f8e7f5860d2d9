use crate::api::recipes::list::PaginationMetadata;
use crate::api::users::view::{subscribed_author_ids, UserProfile};
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::db::DbPool;
use crate::get_conn;
use crate::models::User;
use crate::raw_sql::count_over;
use crate::schema::users;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Number of items to return (default: 6, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListUsersResponse {
    pub users: Vec<UserProfile>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Users", body = ListUsersResponse)
    )
)]
pub async fn list_users(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListUsersParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut conn = get_conn!(pool);

    let rows: Vec<(User, i64)> = match users::table
        .order(users::username.asc())
        .limit(limit)
        .offset(offset)
        .select((User::as_select(), count_over()))
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch users: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch users".to_string(),
                }),
            )
                .into_response();
        }
    };

    let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
    let page: Vec<User> = rows.into_iter().map(|(user, _)| user).collect();

    let ids: Vec<Uuid> = page.iter().map(|u| u.id).collect();
    let subscribed =
        match subscribed_author_ids(&mut conn, viewer.as_ref().map(|u| u.id), &ids) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Failed to fetch subscriptions: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to fetch users".to_string(),
                    }),
                )
                    .into_response();
            }
        };

    let profiles: Vec<UserProfile> = page
        .iter()
        .map(|user| UserProfile::from_user(user, subscribed.contains(&user.id)))
        .collect();

    (
        StatusCode::OK,
        Json(ListUsersResponse {
            users: profiles,
            pagination: PaginationMetadata {
                total,
                limit,
                offset,
            },
        }),
    )
        .into_response()
}
