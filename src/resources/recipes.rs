use reqwest::Method;
use serde::Serialize;

use super::{ResourceClient, ResourceError};
use crate::models::{Recipe, RecipeFilters, SavedRecipeResponse};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedRecipe<'a, S: AsRef<str> + Serialize> {
    recipe_text: &'a str,
    ingredients: &'a [S],
}

impl ResourceClient {
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ResourceError> {
        self.get_json(&["recipes"]).await
    }

    pub async fn get_recipe(&self, id: &str) -> Result<Recipe, ResourceError> {
        self.get_json(&["recipes", id]).await
    }

    /// Recipes that use any of the given ingredient names.
    pub async fn search_recipes<S>(&self, ingredients: &[S]) -> Result<Vec<Recipe>, ResourceError>
    where
        S: AsRef<str> + Serialize,
    {
        self.send_json(Method::POST, &["recipes", "search"], ingredients)
            .await
    }

    pub async fn search_recipes_with_filters(
        &self,
        filters: &RecipeFilters,
    ) -> Result<Vec<Recipe>, ResourceError> {
        self.send_json(Method::POST, &["recipes", "search", "filters"], filters)
            .await
    }

    pub async fn create_recipe(&self, recipe: &Recipe) -> Result<Recipe, ResourceError> {
        self.send_json(Method::POST, &["recipes"], recipe).await
    }

    pub async fn update_recipe(&self, id: &str, recipe: &Recipe) -> Result<Recipe, ResourceError> {
        self.send_json(Method::PUT, &["recipes", id], recipe).await
    }

    pub async fn delete_recipe(&self, id: &str) -> Result<(), ResourceError> {
        self.call(Method::DELETE, &["recipes", id]).await
    }

    pub async fn saved_recipes(&self) -> Result<Vec<Recipe>, ResourceError> {
        self.get_json(&["recipes", "saved"]).await
    }

    pub async fn save_recipe(&self, id: &str) -> Result<Recipe, ResourceError> {
        self.call_json(Method::POST, &["recipes", id, "save"]).await
    }

    pub async fn unsave_recipe(&self, id: &str) -> Result<(), ResourceError> {
        self.call(Method::DELETE, &["recipes", id, "unsave"]).await
    }

    pub async fn popular_recipes(&self) -> Result<Vec<Recipe>, ResourceError> {
        self.get_json(&["recipes", "popular"]).await
    }

    pub async fn recent_recipes(&self) -> Result<Vec<Recipe>, ResourceError> {
        self.get_json(&["recipes", "recent"]).await
    }

    /// Asks the AI endpoint for recipes. The answer is free-form (markdown) text.
    pub async fn generate_recipes<S>(&self, ingredients: &[S]) -> Result<String, ResourceError>
    where
        S: AsRef<str> + Serialize,
    {
        self.send_json_for_text(Method::POST, &["recipes", "generate"], ingredients)
            .await
    }

    /// Stores a generated recipe text as a saved recipe.
    pub async fn save_generated_recipe<S>(
        &self,
        recipe_text: &str,
        ingredients: &[S],
    ) -> Result<SavedRecipeResponse, ResourceError>
    where
        S: AsRef<str> + Serialize,
    {
        let body = GeneratedRecipe {
            recipe_text,
            ingredients,
        };
        self.send_json(Method::POST, &["recipes", "generate", "save"], &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BackendConfig;
    use crate::resources::{ResourceClient, ResourceError};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server) -> ResourceClient {
        ResourceClient::new(&BackendConfig {
            base_url: format!("{}/api", server.url()),
            timeout_in_ms: 2_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_recipes_sends_json_content_type() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/recipes")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"r1","title":"Omelette"},{"_id":"r2","title":"Pancakes"}]"#)
            .create_async()
            .await;

        let recipes = client_for(&server).list_recipes().await.unwrap();
        m.assert_async().await;
        let ids: Vec<_> = recipes.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_search_posts_ingredient_names() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/recipes/search")
            .match_body(Matcher::Json(json!(["egg", "milk"])))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let recipes = client_for(&server)
            .search_recipes(&["egg", "milk"])
            .await
            .unwrap();
        m.assert_async().await;
        assert!(recipes.is_empty());
    }

    #[tokio::test]
    async fn test_generate_returns_plain_text() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/recipes/generate")
            .match_body(Matcher::Json(json!(["egg"])))
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("## Egg fried rice\n1. Cook rice")
            .create_async()
            .await;

        let text = client_for(&server)
            .generate_recipes(&["egg".to_string()])
            .await
            .unwrap();
        m.assert_async().await;
        assert_eq!(text, "## Egg fried rice\n1. Cook rice");
    }

    #[tokio::test]
    async fn test_save_generated_recipe_body_and_reply() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/recipes/generate/save")
            .match_body(Matcher::Json(json!({
                "recipeText": "## Egg fried rice",
                "ingredients": ["egg", "rice"]
            })))
            .with_status(200)
            .with_body(r#"{"success":true,"recipe":{"id":"g1","title":"Generated Recipe","is_saved":true}}"#)
            .create_async()
            .await;

        let saved = client_for(&server)
            .save_generated_recipe("## Egg fried rice", &["egg", "rice"])
            .await
            .unwrap();
        m.assert_async().await;
        assert!(saved.success);
        let recipe = saved.recipe.unwrap();
        assert_eq!(recipe.id.as_deref(), Some("g1"));
        assert_eq!(recipe.is_saved, Some(true));
    }

    #[tokio::test]
    async fn test_save_and_unsave_paths() {
        let mut server = Server::new_async().await;
        let save = server
            .mock("POST", "/api/recipes/r1/save")
            .with_status(200)
            .with_body(r#"{"id":"r1","isSaved":true}"#)
            .create_async()
            .await;
        let unsave = server
            .mock("DELETE", "/api/recipes/r1/unsave")
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(client.save_recipe("r1").await.unwrap().is_saved, Some(true));
        client.unsave_recipe("r1").await.unwrap();
        save.assert_async().await;
        unsave.assert_async().await;
    }

    #[tokio::test]
    async fn test_unsave_unknown_recipe_is_404() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("DELETE", "/api/recipes/nope/unsave")
            .with_status(404)
            .create_async()
            .await;

        let err = client_for(&server).unsave_recipe("nope").await.unwrap_err();
        assert_eq!(err, ResourceError::Status { status: 404 });
    }
}
