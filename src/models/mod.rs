pub mod ingredient;
mod normalize;
pub mod recipe;
pub mod user;

pub use ingredient::{DetectionResult, Ingredient};
pub use recipe::{NutritionInfo, Recipe, RecipeFilters, SavedRecipeResponse};
pub use user::UserProfile;
