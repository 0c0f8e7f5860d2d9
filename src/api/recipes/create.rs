use crate::api::recipes::payload::{validate_payload, RecipePayload};
use crate::api::recipes::view::{build_recipe_views, RecipeView};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::images::decode_data_url;
use crate::models::{NewRecipe, NewRecipeIngredient, NewRecipeTag, Recipe};
use crate::schema::{recipe_ingredients, recipe_tags, recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipePayload,
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeView),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<RecipePayload>,
) -> impl IntoResponse {
    if let Err(message) = validate_payload(&payload) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    let image = match payload.image.as_deref().map(decode_data_url).transpose() {
        Ok(decoded) => decoded,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
                .into_response()
        }
    };

    let mut conn = get_conn!(pool);

    // Recipe row, tag set and ingredient set are written atomically
    let result: Result<Recipe, diesel::result::Error> = conn.transaction(|conn| {
        let new_recipe = NewRecipe {
            author_id: user.id,
            name: &payload.name,
            text: &payload.text,
            cooking_time: payload.cooking_time,
            image: image.as_ref().map(|i| i.data.as_slice()),
            image_content_type: image.as_ref().map(|i| i.content_type.as_str()),
        };

        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        let tag_rows: Vec<NewRecipeTag> = payload
            .tags
            .iter()
            .map(|&tag_id| NewRecipeTag {
                recipe_id: recipe.id,
                tag_id,
            })
            .collect();
        diesel::insert_into(recipe_tags::table)
            .values(&tag_rows)
            .execute(conn)?;

        let ingredient_rows: Vec<NewRecipeIngredient> = payload
            .ingredients
            .iter()
            .map(|i| NewRecipeIngredient {
                recipe_id: recipe.id,
                ingredient_id: i.id,
                amount: i.amount,
            })
            .collect();
        diesel::insert_into(recipe_ingredients::table)
            .values(&ingredient_rows)
            .execute(conn)?;

        Ok(recipe)
    });

    let recipe = match result {
        Ok(r) => r,
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            _,
        )) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Unknown ingredient or tag reference".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    match build_recipe_views(&mut conn, vec![recipe], Some(user.id)) {
        Ok(mut views) if !views.is_empty() => {
            (StatusCode::CREATED, Json(views.remove(0))).into_response()
        }
        Ok(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to load created recipe".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to load created recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load created recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
