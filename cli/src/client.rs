use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use grocer_core::error::{ApiError, Operation};
use grocer_core::models::{GroceryItem, NewGroceryItem, Recipe};
use grocer_core::service::CatalogApi;

use crate::config::Config;

/// HTTP client for the household recipe/grocery service.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("grocer/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(std::time::Duration::from_secs(5)))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(operation: Operation, request: RequestBuilder) -> Result<Response, ApiError> {
        let resp = request.send().await.map_err(|e| ApiError::Transport {
            operation,
            message: e.to_string(),
        })?;
        let status = resp.status();
        debug!(%operation, status = status.as_u16(), "catalog response");
        if !status.is_success() {
            return Err(ApiError::Status {
                operation,
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    async fn fetch<T: DeserializeOwned>(
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = Self::send(operation, request).await?;
        resp.json::<T>().await.map_err(|e| ApiError::Transport {
            operation,
            message: format!("invalid response body: {e}"),
        })
    }
}

impl CatalogApi for CatalogClient {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        Self::fetch(Operation::ListRecipes, self.client.get(self.url("/recipes"))).await
    }

    async fn update_recipe(&self, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let url = self.url(&format!("/recipes/{}", recipe.id));
        Self::fetch(Operation::UpdateRecipe, self.client.put(url).json(recipe)).await
    }

    async fn list_groceries(&self) -> Result<Vec<GroceryItem>, ApiError> {
        Self::fetch(Operation::ListGroceries, self.client.get(self.url("/groceries"))).await
    }

    async fn add_grocery(&self, item: &NewGroceryItem) -> Result<GroceryItem, ApiError> {
        let request = self.client.post(self.url("/groceries")).json(item);
        Self::fetch(Operation::AddGrocery, request).await
    }

    async fn delete_grocery(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/groceries/{id}"));
        Self::send(Operation::DeleteGrocery, self.client.delete(url)).await?;
        Ok(())
    }
}
