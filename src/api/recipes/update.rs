use crate::api::recipes::payload::{validate_payload, RecipePayload};
use crate::api::recipes::view::{build_recipe_views, RecipeView};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::images::decode_data_url;
use crate::models::{NewRecipeIngredient, NewRecipeTag, Recipe};
use crate::schema::{recipe_ingredients, recipe_tags, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipePayload,
    responses(
        (status = 200, description = "Recipe updated successfully", body = RecipeView),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the recipe author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
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

    let author_id: Uuid = match recipes::table
        .find(id)
        .select(recipes::author_id)
        .first(&mut conn)
    {
        Ok(a) => a,
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
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    if author_id != user.id {
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "Only the author can modify this recipe".to_string(),
            }),
        )
            .into_response();
    }

    // The tag and ingredient sets are replaced wholesale, never diffed;
    // the transaction keeps a failed update from leaving a partial set.
    let result: Result<Recipe, diesel::result::Error> = conn.transaction(|conn| {
        let recipe: Recipe = match image.as_ref() {
            Some(decoded) => diesel::update(recipes::table.find(id))
                .set((
                    recipes::name.eq(&payload.name),
                    recipes::text.eq(&payload.text),
                    recipes::cooking_time.eq(payload.cooking_time),
                    recipes::image.eq(Some(decoded.data.as_slice())),
                    recipes::image_content_type.eq(Some(decoded.content_type.as_str())),
                ))
                .returning(Recipe::as_returning())
                .get_result(conn)?,
            None => diesel::update(recipes::table.find(id))
                .set((
                    recipes::name.eq(&payload.name),
                    recipes::text.eq(&payload.text),
                    recipes::cooking_time.eq(payload.cooking_time),
                ))
                .returning(Recipe::as_returning())
                .get_result(conn)?,
        };

        diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(id)))
            .execute(conn)?;
        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)))
            .execute(conn)?;

        let tag_rows: Vec<NewRecipeTag> = payload
            .tags
            .iter()
            .map(|&tag_id| NewRecipeTag {
                recipe_id: id,
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
                recipe_id: id,
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
            tracing::error!("Failed to update recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    match build_recipe_views(&mut conn, vec![recipe], Some(user.id)) {
        Ok(mut views) if !views.is_empty() => {
            (StatusCode::OK, Json(views.remove(0))).into_response()
        }
        Ok(_) | Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to load updated recipe".to_string(),
            }),
        )
            .into_response(),
    }
}
