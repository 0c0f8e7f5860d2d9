use crate::api::users::view::{subscribed_author_ids, UserProfile};
use crate::models::{Recipe, Tag, User};
use crate::schema::{cart_items, favorites, ingredients, recipe_ingredients, recipe_tags, tags, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientView {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe projection returned by recipe reads and writes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeView {
    pub id: Uuid,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Compact projection used by the favorite/cart ledgers and the
/// subscriptions recipe preview.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortRecipeView {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

pub fn image_url(recipe_id: Uuid, has_image: bool) -> Option<String> {
    has_image.then(|| format!("/api/recipes/{}/image", recipe_id))
}

impl ShortRecipeView {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        ShortRecipeView {
            id: recipe.id,
            name: recipe.name.clone(),
            image: image_url(recipe.id, recipe.image_content_type.is_some()),
            cooking_time: recipe.cooking_time,
        }
    }
}

type IngredientRow = (Uuid, Uuid, String, String, i32);

/// Assembles full recipe views for a page of recipe rows, batching the tag,
/// ingredient, author and viewer-flag lookups so a page costs a fixed
/// number of queries.
pub fn build_recipe_views(
    conn: &mut PgConnection,
    page: Vec<Recipe>,
    viewer: Option<Uuid>,
) -> Result<Vec<RecipeView>, diesel::result::Error> {
    if page.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<Uuid> = page.iter().map(|r| r.id).collect();
    let author_ids: Vec<Uuid> = {
        let unique: HashSet<Uuid> = page.iter().map(|r| r.author_id).collect();
        unique.into_iter().collect()
    };

    let tag_rows: Vec<(Uuid, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;
    let mut tags_by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe.entry(recipe_id).or_default().push(tag);
    }

    let ingredient_rows: Vec<IngredientRow> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .order(ingredients::name.asc())
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;
    let mut ingredients_by_recipe: HashMap<Uuid, Vec<RecipeIngredientView>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in ingredient_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientView {
                id,
                name,
                measurement_unit,
                amount,
            });
    }

    let authors: Vec<User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load(conn)?;
    let authors_by_id: HashMap<Uuid, User> =
        authors.into_iter().map(|u| (u.id, u)).collect();

    let subscribed = subscribed_author_ids(conn, viewer, &author_ids)?;
    let (favorited, in_cart) = viewer_ledger_sets(conn, viewer, &recipe_ids)?;

    let views = page
        .into_iter()
        .filter_map(|recipe| {
            // Author rows are FK-guaranteed; a miss means a concurrent
            // delete, in which case the recipe is dropped from the page.
            let author = authors_by_id.get(&recipe.author_id)?;
            Some(RecipeView {
                id: recipe.id,
                tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                author: UserProfile::from_user(author, subscribed.contains(&author.id)),
                ingredients: ingredients_by_recipe
                    .remove(&recipe.id)
                    .unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                name: recipe.name,
                image: image_url(recipe.id, recipe.image_content_type.is_some()),
                text: recipe.text,
                cooking_time: recipe.cooking_time,
                created_at: recipe.created_at,
            })
        })
        .collect();

    Ok(views)
}

/// The viewer's favorite and cart entries among `recipe_ids`; both empty
/// for anonymous viewers.
fn viewer_ledger_sets(
    conn: &mut PgConnection,
    viewer: Option<Uuid>,
    recipe_ids: &[Uuid],
) -> Result<(HashSet<Uuid>, HashSet<Uuid>), diesel::result::Error> {
    let Some(viewer) = viewer else {
        return Ok((HashSet::new(), HashSet::new()));
    };

    let favorited: Vec<Uuid> = favorites::table
        .filter(favorites::user_id.eq(viewer))
        .filter(favorites::recipe_id.eq_any(recipe_ids))
        .select(favorites::recipe_id)
        .load(conn)?;

    let in_cart: Vec<Uuid> = cart_items::table
        .filter(cart_items::user_id.eq(viewer))
        .filter(cart_items::recipe_id.eq_any(recipe_ids))
        .select(cart_items::recipe_id)
        .load(conn)?;

    Ok((
        favorited.into_iter().collect(),
        in_cart.into_iter().collect(),
    ))
}
