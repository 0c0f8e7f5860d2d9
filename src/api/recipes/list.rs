use crate::api::recipes::view::{build_recipe_views, RecipeView};
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Recipe;
use crate::raw_sql::count_over;
use crate::schema::{cart_items, favorites, recipe_tags, recipes, tags};
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
pub struct ListRecipesParams {
    /// Number of items to return (default: 6, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// Comma-separated tag slugs; matches recipes carrying any of them
    pub tags: Option<String>,
    /// "1" or "true": only the viewer's favorited recipes
    pub is_favorited: Option<String>,
    /// "1" or "true": only recipes in the viewer's shopping cart
    pub is_in_shopping_cart: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Total number of items available
    pub total: i64,
    /// Number of items requested (limit)
    pub limit: i64,
    /// Number of items skipped (offset)
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeView>,
    pub pagination: PaginationMetadata,
}

fn flag_is_set(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true"))
}

fn parse_tag_slugs(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes, newest first", body = ListRecipesResponse)
    )
)]
pub async fn list_recipes(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);
    let viewer_id = viewer.as_ref().map(|u| u.id);

    let want_favorited = flag_is_set(&params.is_favorited);
    let want_in_cart = flag_is_set(&params.is_in_shopping_cart);

    // Ledger filters are scoped to the viewer; an anonymous viewer has no
    // ledger, so those filters match nothing.
    if (want_favorited || want_in_cart) && viewer_id.is_none() {
        return (
            StatusCode::OK,
            Json(ListRecipesResponse {
                recipes: Vec::new(),
                pagination: PaginationMetadata {
                    total: 0,
                    limit,
                    offset,
                },
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let mut query = recipes::table.into_boxed();

    if let Some(author) = params.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if let Some(ref tags_param) = params.tags {
        let slugs = parse_tag_slugs(tags_param);
        if !slugs.is_empty() {
            let tagged = recipe_tags::table
                .inner_join(tags::table)
                .filter(tags::slug.eq_any(slugs))
                .select(recipe_tags::recipe_id);
            query = query.filter(recipes::id.eq_any(tagged));
        }
    }

    if let Some(viewer_id) = viewer_id {
        if want_favorited {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(viewer_id))
                .select(favorites::recipe_id);
            query = query.filter(recipes::id.eq_any(favorited));
        }
        if want_in_cart {
            let in_cart = cart_items::table
                .filter(cart_items::user_id.eq(viewer_id))
                .select(cart_items::recipe_id);
            query = query.filter(recipes::id.eq_any(in_cart));
        }
    }

    let rows: Vec<(Recipe, i64)> = match query
        .order(recipes::created_at.desc())
        .limit(limit)
        .offset(offset)
        .select((Recipe::as_select(), count_over()))
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
    let page: Vec<Recipe> = rows.into_iter().map(|(recipe, _)| recipe).collect();

    let views = match build_recipe_views(&mut conn, page, viewer_id) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Failed to assemble recipe views: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(ListRecipesResponse {
            recipes: views,
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
    fn test_flag_parsing() {
        assert!(flag_is_set(&Some("1".to_string())));
        assert!(flag_is_set(&Some("true".to_string())));
        assert!(!flag_is_set(&Some("0".to_string())));
        assert!(!flag_is_set(&Some("yes".to_string())));
        assert!(!flag_is_set(&None));
    }

    #[test]
    fn test_tag_slug_parsing() {
        assert_eq!(
            parse_tag_slugs("breakfast,lunch"),
            vec!["breakfast", "lunch"]
        );
        assert_eq!(parse_tag_slugs(" dinner , "), vec!["dinner"]);
        assert!(parse_tag_slugs("").is_empty());
        assert!(parse_tag_slugs(",,").is_empty());
    }
}
