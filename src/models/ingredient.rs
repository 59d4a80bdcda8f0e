use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::normalize::normalized_serde;
use super::recipe::parse_date;

const INGREDIENT_ALIASES: &[(&str, &str)] = &[
    ("_id", "id"),
    ("image_url", "imageUrl"),
    ("is_detected", "isDetected"),
    ("detected_at", "detectedAt"),
    ("created_at", "createdAt"),
    ("updated_at", "updatedAt"),
];

/// A pantry ingredient, in the one shape the rest of the crate works with.
///
/// The backend is not consistent about naming (`id`/`_id`, `isDetected`/`is_detected`,
/// `createdAt`/`created_at`), so alternate spellings are folded into the camelCase
/// name before decoding. We always write camelCase. Fields we do not model are kept
/// in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_detected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

normalized_serde!(Ingredient, INGREDIENT_ALIASES);

impl Ingredient {
    /// A manually-entered ingredient; category defaults to "Other".
    pub fn manual(name: &str, category: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("Other");
        Ingredient {
            name: Some(name.trim().to_string()),
            category: Some(category.to_string()),
            is_detected: Some(false),
            ..Default::default()
        }
    }

    /// The name, or "" when the backend sent none.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn detected(&self) -> bool {
        self.is_detected.unwrap_or(false)
    }

    /// Day the ingredient was added, if the backend sent a parseable timestamp.
    pub fn added_on(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_date)
    }
}

const DETECTION_ALIASES: &[(&str, &str)] = &[("ingredient_names", "ingredientNames")];

/// Response of the receipt/photo ingredient detection endpoint. Only keys the
/// backend sent are written back, so the payload reaches callers as it arrived.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct DetectionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// e.g. `error` on a failed detection.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

normalized_serde!(DetectionResult, DETECTION_ALIASES);

impl DetectionResult {
    pub fn ingredients(&self) -> &[Ingredient] {
        self.ingredients.as_deref().unwrap_or_default()
    }

    pub fn ingredient_names(&self) -> &[String] {
        self.ingredient_names.as_deref().unwrap_or_default()
    }

    /// The backend's `error` text on a failed detection.
    pub fn error(&self) -> Option<&str> {
        self.extra.get("error").and_then(Value::as_str)
    }
}
