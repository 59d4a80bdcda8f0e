mod common;

use common::test_config;
use mockito::{Matcher, Server};
use pantrychef::config::BackendConfig;
use pantrychef::models::RecipeFilters;
use pantrychef::resources::{ImageUpload, ResourceClient, ResourceError};
use serde_json::json;

fn client_for(server: &Server) -> ResourceClient {
    ResourceClient::new(&test_config(&server.url()).backend).unwrap()
}

#[tokio::test]
async fn test_missing_recipe_carries_status() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/api/recipes/r404")
        .with_status(404)
        .with_body(r#"{"message":"Recipe not found"}"#)
        .create_async()
        .await;

    let err = client_for(&server).get_recipe("r404").await.unwrap_err();
    m.assert_async().await;
    assert_eq!(err, ResourceError::Status { status: 404 });
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_network());
    assert_eq!(err.to_string(), "HTTP error! status: 404");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = ResourceClient::new(&BackendConfig {
        base_url: "http://127.0.0.1:9/api".to_string(),
        timeout_in_ms: 2_000,
    })
    .unwrap();

    let err = client.list_recipes().await.unwrap_err();
    assert!(err.is_network(), "{:?}", err);
    assert_eq!(err.status(), None);
    assert!(err.user_message().contains("Cannot reach the server"));
}

#[tokio::test]
async fn test_detect_returns_backend_payload() {
    let mut server = Server::new_async().await;
    let payload = json!({
        "success": true,
        "ingredients": [{"name": "egg"}],
        "ingredientNames": ["egg"]
    });
    let m = server
        .mock("POST", "/api/ingredients/detect")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=.+".to_string()),
        )
        .match_body(Matcher::Regex(r#"name="image"; filename="receipt.jpg""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(payload.to_string())
        .create_async()
        .await;

    let upload = ImageUpload::new(b"fake-jpeg-bytes".to_vec(), None);
    let result = client_for(&server).detect_ingredients(upload).await.unwrap();
    m.assert_async().await;

    assert!(result.success);
    assert_eq!(result.ingredient_names(), ["egg".to_string()]);
    assert_eq!(serde_json::to_value(&result).unwrap(), payload);
}

#[tokio::test]
async fn test_rejected_upload_is_status_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/ingredients/detect")
        .with_status(413)
        .create_async()
        .await;

    let upload = ImageUpload::new(vec![0; 16], Some("pantry.png"));
    let err = client_for(&server)
        .detect_ingredients(upload)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(413));
    assert_eq!(err.user_message(), "The upload is too large.");
}

#[tokio::test]
async fn test_filtered_search_then_save() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("POST", "/api/recipes/search/filters")
        .match_body(Matcher::Json(json!({
            "maxCalories": 600.0,
            "dietType": "vegetarian"
        })))
        .with_status(200)
        .with_body(r#"[{"_id":"r1","title":"Caprese","prep_time_minutes":10}]"#)
        .create_async()
        .await;
    let save = server
        .mock("POST", "/api/recipes/r1/save")
        .with_status(200)
        .with_body(r#"{"id":"r1","title":"Caprese","isSaved":true}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let filters = RecipeFilters {
        max_calories: Some(600.0),
        diet_type: Some("vegetarian".to_string()),
        ..RecipeFilters::default()
    };
    let found = client.search_recipes_with_filters(&filters).await.unwrap();
    search.assert_async().await;
    assert_eq!(found[0].id.as_deref(), Some("r1"));
    assert_eq!(found[0].total_time_minutes(), Some(10));

    let saved = client.save_recipe("r1").await.unwrap();
    save.assert_async().await;
    assert_eq!(saved.is_saved, Some(true));
}
