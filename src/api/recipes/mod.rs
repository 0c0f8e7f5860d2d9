pub mod create;
pub mod delete;
pub mod download_shopping_cart;
pub mod favorite;
pub mod get;
pub mod get_link;
pub mod image;
pub mod list;
pub mod payload;
pub mod shopping_cart;
pub mod update;
pub mod view;

use crate::AppState;
use axum::routing::{get as get_method, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes",
            get_method(list::list_recipes).post(create::create_recipe),
        )
        .route(
            "/api/recipes/download_shopping_cart",
            get_method(download_shopping_cart::download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}",
            get_method(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/api/recipes/{id}/image", get_method(image::get_image))
        .route("/api/recipes/{id}/get-link", get_method(get_link::get_link))
        .route(
            "/api/recipes/{id}/favorite",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart",
            post(shopping_cart::add_to_cart).delete(shopping_cart::remove_from_cart),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_cart,
        shopping_cart::remove_from_cart,
        download_shopping_cart::download_shopping_cart,
        get_link::get_link,
        image::get_image,
    ),
    components(schemas(
        payload::RecipePayload,
        payload::RecipeIngredientInput,
        view::RecipeView,
        view::RecipeIngredientView,
        view::ShortRecipeView,
        list::ListRecipesResponse,
        list::PaginationMetadata,
        get_link::ShortLinkResponse,
    ))
)]
pub struct ApiDoc;
