use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::{ResourceClient, ResourceError};
use crate::models::{DetectionResult, Ingredient};

const DEFAULT_IMAGE_NAME: &str = "receipt.jpg";
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A photo to run through ingredient detection.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl ImageUpload {
    /// Wraps raw bytes; the MIME type is guessed from the file name's extension.
    pub fn new(bytes: Vec<u8>, file_name: Option<&str>) -> Self {
        let file_name = file_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_NAME)
            .to_string();
        let mime_type = mime_for(&file_name);
        ImageUpload {
            bytes,
            file_name,
            mime_type,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path.file_name().and_then(|n| n.to_str());
        Ok(Self::new(bytes, name))
    }

    fn into_form(self) -> Result<Form, ResourceError> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| ResourceError::Config(format!("bad image type: {}", e)))?;
        Ok(Form::new().part("image", part))
    }
}

fn mime_for(file_name: &str) -> String {
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
    {
        Some(ext) if ext == "jpg" => DEFAULT_IMAGE_MIME.to_string(),
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!("image/{}", ext)
        }
        _ => DEFAULT_IMAGE_MIME.to_string(),
    }
}

impl ResourceClient {
    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ResourceError> {
        self.get_json(&["ingredients"]).await
    }

    pub async fn get_ingredient(&self, id: &str) -> Result<Ingredient, ResourceError> {
        self.get_json(&["ingredients", id]).await
    }

    /// Free-text search; the query is sent as a JSON string.
    pub async fn search_ingredients(&self, query: &str) -> Result<Vec<Ingredient>, ResourceError> {
        self.send_json(Method::POST, &["ingredients", "search"], query)
            .await
    }

    pub async fn ingredients_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Ingredient>, ResourceError> {
        self.get_json(&["ingredients", "category", category]).await
    }

    pub async fn create_ingredient(
        &self,
        ingredient: &Ingredient,
    ) -> Result<Ingredient, ResourceError> {
        self.send_json(Method::POST, &["ingredients"], ingredient)
            .await
    }

    pub async fn update_ingredient(
        &self,
        id: &str,
        ingredient: &Ingredient,
    ) -> Result<Ingredient, ResourceError> {
        self.send_json(Method::PUT, &["ingredients", id], ingredient)
            .await
    }

    pub async fn delete_ingredient(&self, id: &str) -> Result<(), ResourceError> {
        self.call(Method::DELETE, &["ingredients", id]).await
    }

    /// Uploads a receipt/pantry photo and returns what the backend recognised.
    pub async fn detect_ingredients(
        &self,
        image: ImageUpload,
    ) -> Result<DetectionResult, ResourceError> {
        let form = image.into_form()?;
        self.post_multipart(&["ingredients", "detect"], form).await
    }
}
