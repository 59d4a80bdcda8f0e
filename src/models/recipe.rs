use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::normalize::normalized_serde;

const RECIPE_ALIASES: &[(&str, &str)] = &[
    ("_id", "id"),
    ("image_url", "imageUrl"),
    ("prep_time_minutes", "prepTimeMinutes"),
    ("cook_time_minutes", "cookTimeMinutes"),
    ("review_count", "reviewCount"),
    ("is_saved", "isSaved"),
    ("created_at", "createdAt"),
    ("updated_at", "updatedAt"),
];

/// A recipe as served by the backend. Same normalization rules as `Ingredient`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

normalized_serde!(Recipe, RECIPE_ALIASES);

impl Recipe {
    /// Prep + cook time, when at least one of them is known.
    pub fn total_time_minutes(&self) -> Option<u32> {
        match (self.prep_time_minutes, self.cook_time_minutes) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0) + cook.unwrap_or(0)),
        }
    }

    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_date)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NutritionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
}

/// Body of `POST /recipes/search/filters`. Unset filters are not sent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_prep_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cook_time: Option<u32>,
}

/// Response of `POST /recipes/generate/save`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SavedRecipeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accepts both zone-less (`2024-05-01T09:30:00.123`) and RFC 3339 timestamps.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_from_backend_payload() {
        let recipe: Recipe = serde_json::from_value(json!({
            "_id": "r1",
            "title": "Shakshuka",
            "prep_time_minutes": 10,
            "cookTimeMinutes": 20,
            "ingredients": ["egg", "tomato"],
            "nutrition": {"calories": 320.5},
            "is_saved": true,
            "created_at": "2024-05-01T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(recipe.id.as_deref(), Some("r1"));
        assert_eq!(recipe.total_time_minutes(), Some(30));
        assert_eq!(recipe.is_saved, Some(true));
        assert_eq!(recipe.nutrition.as_ref().unwrap().calories, Some(320.5));
        assert_eq!(recipe.created_on(), NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_duplicate_id_spellings_decode() {
        let recipes: Vec<Recipe> = serde_json::from_value(json!([
            {"id": "r1", "_id": "r1", "title": "Omelette", "is_saved": true, "isSaved": false}
        ]))
        .unwrap();
        assert_eq!(recipes[0].id.as_deref(), Some("r1"));
        assert_eq!(recipes[0].is_saved, Some(false));
        assert!(recipes[0].extra.is_empty());
    }

    #[test]
    fn test_failed_save_keeps_error() {
        let value = json!({"success": false, "error": "Recipe text is empty"});
        let response: SavedRecipeResponse = serde_json::from_value(value.clone()).unwrap();
        assert!(!response.success);
        assert_eq!(response.extra["error"], json!("Recipe text is empty"));
        assert_eq!(serde_json::to_value(&response).unwrap(), value);
    }

    #[test]
    fn test_filters_skip_unset_fields() {
        let filters = RecipeFilters {
            max_calories: Some(500.0),
            diet_type: Some("vegetarian".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({"maxCalories": 500.0, "dietType": "vegetarian"})
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(
            parse_date("2023-12-31T23:59:59.123456"),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
    }
}
