pub mod avatar;
pub mod get;
pub mod list;
pub mod me;
pub mod subscribe;
pub mod subscriptions;
pub mod view;

use crate::AppState;
use axum::routing::{get as get_method, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get_method(list::list_users))
        .route("/api/users/me", get_method(me::me))
        .route(
            "/api/users/me/avatar",
            put(avatar::put_avatar).delete(avatar::delete_avatar),
        )
        .route(
            "/api/users/subscriptions",
            get_method(subscriptions::list_subscriptions),
        )
        .route("/api/users/{id}", get_method(get::get_user))
        .route("/api/users/{id}/avatar", get_method(avatar::get_avatar))
        .route(
            "/api/users/{id}/subscribe",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_users,
        get::get_user,
        me::me,
        avatar::put_avatar,
        avatar::delete_avatar,
        avatar::get_avatar,
        subscribe::subscribe,
        subscribe::unsubscribe,
        subscriptions::list_subscriptions,
    ),
    components(schemas(
        view::UserProfile,
        list::ListUsersResponse,
        avatar::AvatarRequest,
        avatar::AvatarResponse,
        subscriptions::SubscriptionAuthor,
        subscriptions::ListSubscriptionsResponse,
    ))
)]
pub struct ApiDoc;
