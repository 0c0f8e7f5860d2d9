use crate::api::ErrorResponse;
use crate::constants::SHORT_LINK_URL_MAX;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewShortLink;
use crate::schema::{recipes, short_links};
use crate::shortener::generate_token;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Collision retries before giving up; each retry draws a fresh token.
const MAX_TOKEN_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

fn scheme_and_host(headers: &HeaderMap) -> Result<(String, String), String> {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| "Missing Host header".to_string())?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");
    Ok((scheme.to_string(), host.to_string()))
}

/// The page the client was on when asking, else the API detail URL.
fn original_url_for(headers: &HeaderMap, scheme: &str, host: &str, recipe_id: Uuid) -> String {
    match headers.get(header::REFERER).and_then(|h| h.to_str().ok()) {
        Some(referer) => referer.to_string(),
        None => format!("{}://{}/api/recipes/{}", scheme, host, recipe_id),
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Short link for the recipe", body = ShortLinkResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_link(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let (scheme, host) = match scheme_and_host(&headers) {
        Ok(pair) => pair,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
                .into_response()
        }
    };

    let mut conn = get_conn!(pool);

    let recipe_exists: bool = match diesel::select(diesel::dsl::exists(
        recipes::table.filter(recipes::id.eq(id)),
    ))
    .get_result(&mut conn)
    {
        Ok(exists) => exists,
        Err(e) => {
            tracing::error!("Failed to check recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create short link".to_string(),
                }),
            )
                .into_response();
        }
    };

    if !recipe_exists {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response();
    }

    let original_url = original_url_for(&headers, &scheme, &host, id);
    if original_url.len() > SHORT_LINK_URL_MAX {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "URL is too long to shorten".to_string(),
            }),
        )
            .into_response();
    }

    // Reuse an existing mapping for this URL; mappings are immutable
    let existing: Option<String> = match short_links::table
        .filter(short_links::original_url.eq(&original_url))
        .select(short_links::url_hash)
        .first(&mut conn)
        .optional()
    {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to look up short link: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create short link".to_string(),
                }),
            )
                .into_response();
        }
    };

    let url_hash = match existing {
        Some(hash) => hash,
        None => {
            let mut allocated = None;
            for _ in 0..MAX_TOKEN_ATTEMPTS {
                let token = generate_token();
                match diesel::insert_into(short_links::table)
                    .values(&NewShortLink {
                        url_hash: &token,
                        original_url: &original_url,
                    })
                    .execute(&mut conn)
                {
                    Ok(_) => {
                        allocated = Some(token);
                        break;
                    }
                    // Token collision: another URL got there first, retry
                    Err(diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _,
                    )) => continue,
                    Err(e) => {
                        tracing::error!("Failed to store short link: {}", e);
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(ErrorResponse {
                                error: "Failed to create short link".to_string(),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            match allocated {
                Some(token) => token,
                None => {
                    tracing::error!(
                        "Exhausted {} short-link token attempts",
                        MAX_TOKEN_ATTEMPTS
                    );
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to create short link".to_string(),
                        }),
                    )
                        .into_response();
                }
            }
        }
    };

    (
        StatusCode::OK,
        Json(ShortLinkResponse {
            short_link: format!("{}://{}/s/{}", scheme, host, url_hash),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referer_wins_over_detail_url() {
        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, "https://app.example/recipes/42".parse().unwrap());
        let id = Uuid::new_v4();
        assert_eq!(
            original_url_for(&headers, "http", "api.example", id),
            "https://app.example/recipes/42"
        );
    }

    #[test]
    fn test_detail_url_fallback() {
        let headers = HeaderMap::new();
        let id = Uuid::new_v4();
        assert_eq!(
            original_url_for(&headers, "https", "api.example", id),
            format!("https://api.example/api/recipes/{}", id)
        );
    }

    #[test]
    fn test_scheme_defaults_to_http() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "api.example".parse().unwrap());
        let (scheme, host) = scheme_and_host(&headers).unwrap();
        assert_eq!(scheme, "http");
        assert_eq!(host, "api.example");
    }

    #[test]
    fn test_forwarded_proto_respected() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "api.example".parse().unwrap());
        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        let (scheme, _) = scheme_and_host(&headers).unwrap();
        assert_eq!(scheme, "https");
    }

    #[test]
    fn test_missing_host_is_an_error() {
        assert!(scheme_and_host(&HeaderMap::new()).is_err());
    }
}
