use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{cart_items, ingredients, recipe_ingredients, recipes};
use crate::shopping_list;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use diesel::dsl::sum;
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Aggregated shopping list", content_type = "text/plain"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    // Sum each ingredient across every recipe in the cart; the unit is
    // part of the group key, so "Flour (g)" and "Flour (cup)" stay apart.
    let rows: Vec<(String, String, Option<i64>)> = match cart_items::table
        .inner_join(
            recipes::table.inner_join(recipe_ingredients::table.inner_join(ingredients::table)),
        )
        .filter(cart_items::user_id.eq(user.id))
        .group_by((ingredients::name, ingredients::measurement_unit))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            sum(recipe_ingredients::amount),
        ))
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to aggregate shopping cart: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to build shopping list".to_string(),
                }),
            )
                .into_response();
        }
    };

    let grouped: Vec<shopping_list::ShoppingListRow> = rows
        .into_iter()
        .map(|(name, unit, total)| (name, unit, total.unwrap_or(0)))
        .collect();

    let document = shopping_list::render(grouped);

    match axum::http::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"shopping_list.txt\"",
        )
        .body(Body::from(document))
    {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to build shopping list response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to build shopping list".to_string(),
                }),
            )
                .into_response()
        }
    }
}
