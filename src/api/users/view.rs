use crate::models::User;
use crate::schema::subscriptions;
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

/// Public profile projection; `is_subscribed` is scoped to the viewer and
/// always false for anonymous viewers and for the viewer's own row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

pub fn avatar_url(user_id: Uuid, has_avatar: bool) -> Option<String> {
    has_avatar.then(|| format!("/api/users/{}/avatar", user_id))
}

impl UserProfile {
    pub fn from_user(user: &User, is_subscribed: bool) -> Self {
        UserProfile {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
            avatar: avatar_url(user.id, user.avatar_content_type.is_some()),
        }
    }
}

/// Returns the subset of `author_ids` the viewer is subscribed to. Empty
/// for anonymous viewers.
pub fn subscribed_author_ids(
    conn: &mut PgConnection,
    viewer: Option<Uuid>,
    author_ids: &[Uuid],
) -> Result<HashSet<Uuid>, diesel::result::Error> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let ids: Vec<Uuid> = subscriptions::table
        .filter(subscriptions::user_id.eq(viewer))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load(conn)?;

    Ok(ids.into_iter().collect())
}
