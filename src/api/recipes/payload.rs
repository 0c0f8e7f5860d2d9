use crate::constants::{COOKING_TIME_MIN, INGREDIENT_AMOUNT_MIN, MAX_RECIPE_NAME_LEN};
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

/// Ingredient reference with its amount, as submitted by clients.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeIngredientInput {
    pub id: Uuid,
    pub amount: i32,
}

/// Request body shared by recipe create and update. Updates replace the
/// full tag and ingredient sets, so the shape is identical.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipePayload {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    /// Optional base64 data-URL image (`data:image/png;base64,...`)
    pub image: Option<String>,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<RecipeIngredientInput>,
}

pub fn validate_payload(payload: &RecipePayload) -> Result<(), String> {
    if payload.name.trim().is_empty() {
        return Err("Recipe name cannot be empty".to_string());
    }
    if payload.name.len() > MAX_RECIPE_NAME_LEN {
        return Err("Recipe name is too long".to_string());
    }
    if payload.text.trim().is_empty() {
        return Err("Recipe text cannot be empty".to_string());
    }
    if payload.cooking_time < COOKING_TIME_MIN {
        return Err("Cooking time must be at least one minute".to_string());
    }

    if payload.tags.is_empty() {
        return Err("At least one tag is required".to_string());
    }
    let unique_tags: HashSet<Uuid> = payload.tags.iter().copied().collect();
    if unique_tags.len() != payload.tags.len() {
        return Err("Tags must be unique".to_string());
    }

    if payload.ingredients.is_empty() {
        return Err("At least one ingredient is required".to_string());
    }
    let unique_ingredients: HashSet<Uuid> =
        payload.ingredients.iter().map(|i| i.id).collect();
    if unique_ingredients.len() != payload.ingredients.len() {
        return Err("Ingredients must be unique".to_string());
    }
    if payload
        .ingredients
        .iter()
        .any(|i| i.amount < INGREDIENT_AMOUNT_MIN)
    {
        return Err("Ingredient amount must be at least one".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> RecipePayload {
        RecipePayload {
            name: "Borscht".to_string(),
            text: "Chop, boil, serve.".to_string(),
            cooking_time: 60,
            image: None,
            tags: vec![Uuid::new_v4()],
            ingredients: vec![RecipeIngredientInput {
                id: Uuid::new_v4(),
                amount: 2,
            }],
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_payload(&payload()).is_ok());
    }

    #[test]
    fn test_rejects_cooking_time_below_minimum() {
        let mut p = payload();
        p.cooking_time = 0;
        assert!(validate_payload(&p).is_err());
        p.cooking_time = -5;
        assert!(validate_payload(&p).is_err());
    }

    #[test]
    fn test_rejects_empty_tags() {
        let mut p = payload();
        p.tags.clear();
        assert!(validate_payload(&p).is_err());
    }

    #[test]
    fn test_rejects_duplicate_tags() {
        let mut p = payload();
        let tag = Uuid::new_v4();
        p.tags = vec![tag, Uuid::new_v4(), tag];
        assert!(validate_payload(&p).is_err());
    }

    #[test]
    fn test_rejects_empty_ingredients() {
        let mut p = payload();
        p.ingredients.clear();
        assert!(validate_payload(&p).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ingredients_regardless_of_order() {
        let mut p = payload();
        let dup = Uuid::new_v4();
        p.ingredients = vec![
            RecipeIngredientInput { id: dup, amount: 1 },
            RecipeIngredientInput {
                id: Uuid::new_v4(),
                amount: 3,
            },
            RecipeIngredientInput { id: dup, amount: 2 },
        ];
        assert!(validate_payload(&p).is_err());
    }

    #[test]
    fn test_rejects_zero_amount() {
        let mut p = payload();
        p.ingredients[0].amount = 0;
        assert!(validate_payload(&p).is_err());
    }

    #[test]
    fn test_rejects_blank_name_and_text() {
        let mut p = payload();
        p.name = "   ".to_string();
        assert!(validate_payload(&p).is_err());

        let mut p = payload();
        p.text = String::new();
        assert!(validate_payload(&p).is_err());
    }
}
