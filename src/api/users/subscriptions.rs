use crate::api::recipes::list::PaginationMetadata;
use crate::api::recipes::view::ShortRecipeView;
use crate::api::users::view::avatar_url;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SUBSCRIPTION_RECIPES_PREVIEW};
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Recipe, User};
use crate::raw_sql::count_over;
use crate::schema::{recipes, subscriptions, users};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSubscriptionsParams {
    /// Number of authors to return (default: 6, max: 100)
    pub limit: Option<i64>,
    /// Number of authors to skip (default: 0)
    pub offset: Option<i64>,
    /// Recipe preview size per author; capped at the system default.
    /// Non-numeric values fall back to the default.
    pub recipes_limit: Option<String>,
}

/// Followed author annotated with a recipe preview and total count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionAuthor {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
    pub recipes: Vec<ShortRecipeView>,
    pub recipes_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListSubscriptionsResponse {
    pub authors: Vec<SubscriptionAuthor>,
    pub pagination: PaginationMetadata,
}

/// The preview never exceeds the system default; the query parameter can
/// only shrink it.
fn effective_recipes_limit(param: Option<&str>) -> i64 {
    match param.and_then(|s| s.parse::<i64>().ok()) {
        Some(n) if n >= 0 => n.min(SUBSCRIPTION_RECIPES_PREVIEW),
        _ => SUBSCRIPTION_RECIPES_PREVIEW,
    }
}

/// Builds the subscription view for one author: profile plus the most
/// recent recipes (capped) and the total recipe count.
pub fn build_subscription_author(
    conn: &mut PgConnection,
    author: &User,
    recipes_limit: i64,
    recipes_count: i64,
) -> Result<SubscriptionAuthor, diesel::result::Error> {
    let preview: Vec<Recipe> = recipes::table
        .filter(recipes::author_id.eq(author.id))
        .order(recipes::created_at.desc())
        .limit(recipes_limit)
        .select(Recipe::as_select())
        .load(conn)?;

    Ok(SubscriptionAuthor {
        id: author.id,
        email: author.email.clone(),
        username: author.username.clone(),
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
        is_subscribed: true,
        avatar: avatar_url(author.id, author.avatar_content_type.is_some()),
        recipes: preview.iter().map(ShortRecipeView::from_recipe).collect(),
        recipes_count,
    })
}

/// Total recipe counts for the given authors, zero-filled for authors with
/// no recipes.
pub fn recipe_counts(
    conn: &mut PgConnection,
    author_ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, diesel::result::Error> {
    if author_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let counts: Vec<(Uuid, i64)> = recipes::table
        .filter(recipes::author_id.eq_any(author_ids))
        .group_by(recipes::author_id)
        .select((recipes::author_id, diesel::dsl::count_star()))
        .load(conn)?;
    Ok(counts.into_iter().collect())
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(ListSubscriptionsParams),
    responses(
        (status = 200, description = "Followed authors with recipe previews", body = ListSubscriptionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListSubscriptionsParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);
    let recipes_limit = effective_recipes_limit(params.recipes_limit.as_deref());

    let mut conn = get_conn!(pool);

    let rows: Vec<(User, i64)> = match subscriptions::table
        .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
        .filter(subscriptions::user_id.eq(user.id))
        .order(subscriptions::created_at.desc())
        .limit(limit)
        .offset(offset)
        .select((User::as_select(), count_over()))
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch subscriptions: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch subscriptions".to_string(),
                }),
            )
                .into_response();
        }
    };

    let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
    let authors: Vec<User> = rows.into_iter().map(|(author, _)| author).collect();
    let author_ids: Vec<Uuid> = authors.iter().map(|a| a.id).collect();

    let counts = match recipe_counts(&mut conn, &author_ids) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to count recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch subscriptions".to_string(),
                }),
            )
                .into_response();
        }
    };

    let mut views = Vec::with_capacity(authors.len());
    for author in &authors {
        let recipes_count = counts.get(&author.id).copied().unwrap_or(0);
        match build_subscription_author(&mut conn, author, recipes_limit, recipes_count) {
            Ok(view) => views.push(view),
            Err(e) => {
                tracing::error!("Failed to build subscription view: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to fetch subscriptions".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    }

    (
        StatusCode::OK,
        Json(ListSubscriptionsResponse {
            authors: views,
            pagination: PaginationMetadata {
                total,
                limit,
                offset,
            },
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_limit_uses_default() {
        assert_eq!(effective_recipes_limit(None), SUBSCRIPTION_RECIPES_PREVIEW);
    }

    #[test]
    fn test_non_numeric_limit_uses_default() {
        assert_eq!(
            effective_recipes_limit(Some("lots")),
            SUBSCRIPTION_RECIPES_PREVIEW
        );
        assert_eq!(
            effective_recipes_limit(Some("")),
            SUBSCRIPTION_RECIPES_PREVIEW
        );
    }

    #[test]
    fn test_limit_is_capped_at_default() {
        assert_eq!(
            effective_recipes_limit(Some("1000")),
            SUBSCRIPTION_RECIPES_PREVIEW
        );
    }

    #[test]
    fn test_smaller_limit_is_honored() {
        assert_eq!(effective_recipes_limit(Some("2")), 2);
        assert_eq!(effective_recipes_limit(Some("0")), 0);
    }

    #[test]
    fn test_negative_limit_uses_default() {
        assert_eq!(
            effective_recipes_limit(Some("-3")),
            SUBSCRIPTION_RECIPES_PREVIEW
        );
    }
}
