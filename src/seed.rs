//! Idempotent catalog seeding from JSON files (`--seed <dir>`).
//!
//! `ingredients.json` holds `[{"name", "measurement_unit"}]`; an optional
//! `tags.json` holds `[{"name", "slug"}]`. Existing rows are left alone.

use crate::constants::{
    MAX_INGREDIENT_NAME_LEN, MAX_MEASUREMENT_UNIT_LEN, MAX_TAG_NAME_LEN, MAX_TAG_SLUG_LEN,
};
use crate::db::DbPool;
use crate::models::{NewIngredient, NewTag};
use crate::schema::{ingredients, tags};
use crate::validate::validate_tag_slug;
use diesel::prelude::*;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct IngredientSeed {
    name: String,
    measurement_unit: String,
}

#[derive(Debug, Deserialize)]
struct TagSeed {
    name: String,
    slug: String,
}

pub fn run(pool: &DbPool, dir: &Path) -> Result<(), String> {
    let mut conn = pool
        .get()
        .map_err(|e| format!("Failed to get DB connection: {}", e))?;

    let ingredients_path = dir.join("ingredients.json");
    let raw = std::fs::read_to_string(&ingredients_path)
        .map_err(|e| format!("Failed to read {}: {}", ingredients_path.display(), e))?;
    let seeds: Vec<IngredientSeed> =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid ingredients.json: {}", e))?;

    let mut inserted = 0;
    for seed in &seeds {
        if seed.name.is_empty() || seed.name.len() > MAX_INGREDIENT_NAME_LEN {
            return Err(format!("Bad ingredient name: {:?}", seed.name));
        }
        if seed.measurement_unit.is_empty()
            || seed.measurement_unit.len() > MAX_MEASUREMENT_UNIT_LEN
        {
            return Err(format!("Bad measurement unit: {:?}", seed.measurement_unit));
        }

        inserted += diesel::insert_into(ingredients::table)
            .values(&NewIngredient {
                name: &seed.name,
                measurement_unit: &seed.measurement_unit,
            })
            .on_conflict((ingredients::name, ingredients::measurement_unit))
            .do_nothing()
            .execute(&mut conn)
            .map_err(|e| format!("Failed to insert ingredient {:?}: {}", seed.name, e))?;
    }
    tracing::info!(
        "Seeded {} of {} ingredients from {}",
        inserted,
        seeds.len(),
        ingredients_path.display()
    );

    let tags_path = dir.join("tags.json");
    if tags_path.exists() {
        let raw = std::fs::read_to_string(&tags_path)
            .map_err(|e| format!("Failed to read {}: {}", tags_path.display(), e))?;
        let seeds: Vec<TagSeed> =
            serde_json::from_str(&raw).map_err(|e| format!("Invalid tags.json: {}", e))?;

        let mut inserted = 0;
        for seed in &seeds {
            if seed.name.is_empty() || seed.name.len() > MAX_TAG_NAME_LEN {
                return Err(format!("Bad tag name: {:?}", seed.name));
            }
            if seed.slug.len() > MAX_TAG_SLUG_LEN {
                return Err(format!("Bad tag slug: {:?}", seed.slug));
            }
            validate_tag_slug(&seed.slug)?;

            inserted += diesel::insert_into(tags::table)
                .values(&NewTag {
                    name: &seed.name,
                    slug: &seed.slug,
                })
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .map_err(|e| format!("Failed to insert tag {:?}: {}", seed.name, e))?;
        }
        tracing::info!(
            "Seeded {} of {} tags from {}",
            inserted,
            seeds.len(),
            tags_path.display()
        );
    }

    Ok(())
}
