use crate::api::ErrorResponse;
use crate::auth::{create_session, hash_password};
use crate::constants::{MAX_EMAIL_LEN, MAX_PERSON_NAME_LEN, MAX_USERNAME_LEN};
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewUser;
use crate::schema::users;
use crate::validate::validate_username;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub token: String,
}

fn validate_signup(req: &SignupRequest) -> Result<(), String> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err("A valid email address is required".to_string());
    }
    if req.email.len() > MAX_EMAIL_LEN {
        return Err("Email address is too long".to_string());
    }
    if req.username.len() > MAX_USERNAME_LEN {
        return Err("Username is too long".to_string());
    }
    validate_username(&req.username)?;
    if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
        return Err("First and last name are required".to_string());
    }
    if req.first_name.len() > MAX_PERSON_NAME_LEN || req.last_name.len() > MAX_PERSON_NAME_LEN {
        return Err("Name is too long".to_string());
    }
    if req.password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body(content = SignupRequest, example = json!({
        "email": "user@example.com",
        "username": "user",
        "first_name": "First",
        "last_name": "Last",
        "password": "password"
    })),
    responses(
        (status = 201, description = "User created successfully", body = SignupResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email or username already taken", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<SignupRequest>,
) -> impl IntoResponse {
    if let Err(message) = validate_signup(&req) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    let mut conn = get_conn!(pool);

    let password_hash = match hash_password(&req.password) {
        Ok(h) => h,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to hash password".to_string(),
                }),
            )
                .into_response()
        }
    };

    let new_user = NewUser {
        email: &req.email,
        username: &req.username,
        first_name: &req.first_name,
        last_name: &req.last_name,
        password_hash: &password_hash,
    };

    let user_id: Uuid = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(users::id)
        .get_result(&mut conn)
    {
        Ok(id) => id,
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "A user with that email or username already exists".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create user".to_string(),
                }),
            )
                .into_response();
        }
    };

    let token = match create_session(&mut conn, user_id) {
        Ok(t) => t,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create session".to_string(),
                }),
            )
                .into_response()
        }
    };

    (StatusCode::CREATED, Json(SignupResponse { user_id, token })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(email: &str, username: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            username: username.to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(validate_signup(&req("a@b.com", "alice")).is_ok());
    }

    #[test]
    fn test_rejects_reserved_username() {
        assert!(validate_signup(&req("a@b.com", "me")).is_err());
    }

    #[test]
    fn test_rejects_bad_email() {
        assert!(validate_signup(&req("not-an-email", "alice")).is_err());
        assert!(validate_signup(&req("", "alice")).is_err());
    }

    #[test]
    fn test_rejects_empty_password() {
        let mut r = req("a@b.com", "alice");
        r.password = String::new();
        assert!(validate_signup(&r).is_err());
    }
}
