use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::RelayError;

/// Upstream recipe service the relay forwards to
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Whether a credential is available for upstream calls
    fn has_credential(&self) -> bool;

    /// Recipe summaries using the comma-separated `ingredients`
    async fn find_by_ingredients(&self, ingredients: &str) -> Result<Value, RelayError>;

    /// Full recipe detail for `id`, forwarded as given
    async fn recipe_information(&self, id: &str) -> Result<Value, RelayError>;
}

/// Client for the Spoonacular recipe API
pub struct SpoonacularClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    results: u32,
}

impl SpoonacularClient {
    /// Create a client from relay configuration
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(SpoonacularClient {
            client: builder.build()?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            results: config.results,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        SpoonacularClient {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            results: 10,
        }
    }

    fn api_key(&self) -> Result<&str, RelayError> {
        self.api_key.as_deref().ok_or(RelayError::MissingApiKey)
    }

    /// Upstream URL with each of `segments` appended as one encoded path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RelayError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RelayError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|()| RelayError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Value, RelayError> {
        let api_key = self.api_key()?;
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();

        debug!("GET {}", path);
        let response = self
            .client
            .get(url)
            .query(&[("apiKey", api_key)])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        debug!("{} -> {}", path, status);
        if status == StatusCode::UNAUTHORIZED {
            return Err(RelayError::InvalidApiKey);
        }
        if !status.is_success() {
            return Err(RelayError::UpstreamStatus(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn find_by_ingredients(&self, ingredients: &str) -> Result<Value, RelayError> {
        self.get_json(
            &["recipes", "findByIngredients"],
            &[
                ("ingredients", ingredients.to_string()),
                ("number", self.results.to_string()),
            ],
        )
        .await
    }

    async fn recipe_information(&self, id: &str) -> Result<Value, RelayError> {
        self.get_json(&["recipes", id, "information"], &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_find_by_ingredients() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/findByIngredients")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("apiKey".into(), "fake_api_key".into()),
                Matcher::UrlEncoded("ingredients".into(), "apple,flour".into()),
                Matcher::UrlEncoded("number".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "title": "Apple Pie"}, {"id": 2, "title": "Apple Crumble"}]"#)
            .create_async()
            .await;

        let client = SpoonacularClient::with_base_url(Some("fake_api_key".to_string()), server.url());
        let result = client.find_by_ingredients("apple,flour").await.unwrap();

        assert_eq!(result.as_array().map(Vec::len), Some(2));
        assert_eq!(result[0]["title"], "Apple Pie");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_recipe_information() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/42/information")
            .match_query(Matcher::UrlEncoded("apiKey".into(), "fake_api_key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 42, "title": "Soup", "readyInMinutes": 30}"#)
            .create_async()
            .await;

        let client = SpoonacularClient::with_base_url(Some("fake_api_key".to_string()), server.url());
        let result = client.recipe_information("42").await.unwrap();

        assert_eq!(result["readyInMinutes"], 30);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_invalid_key() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes/42/information")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status": "failure"}"#)
            .create_async()
            .await;

        let client = SpoonacularClient::with_base_url(Some("bad".to_string()), server.url());
        let result = client.recipe_information("42").await;

        assert!(matches!(result, Err(RelayError::InvalidApiKey)));
    }

    #[tokio::test]
    async fn test_other_failures_keep_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes/findByIngredients")
            .match_query(Matcher::Any)
            .with_status(402)
            .create_async()
            .await;

        let client = SpoonacularClient::with_base_url(Some("key".to_string()), server.url());
        let err = client.find_by_ingredients("rice").await.unwrap_err();

        assert!(matches!(err, RelayError::UpstreamStatus(402)));
        assert_eq!(err.to_string(), "API Error: 402");
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_upstream() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = SpoonacularClient::with_base_url(None, server.url());
        assert!(!client.has_credential());

        let result = client.find_by_ingredients("rice").await;
        assert!(matches!(result, Err(RelayError::MissingApiKey)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_id_is_forwarded_as_one_segment() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/..%2Fadmin/information")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = SpoonacularClient::with_base_url(Some("key".to_string()), server.url());
        let result = client.recipe_information("../admin").await;

        assert!(matches!(result, Err(RelayError::UpstreamStatus(404))));
        mock.assert_async().await;
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = SpoonacularClient::with_base_url(
            None,
            "http://localhost:9999/proxy/".to_string(),
        );
        let url = client.endpoint(&["recipes", "abc", "information"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9999/proxy/recipes/abc/information");

        let client = SpoonacularClient::with_base_url(None, "not a url".to_string());
        assert!(matches!(
            client.endpoint(&["recipes"]),
            Err(RelayError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_new_from_config() {
        let config = RelayConfig {
            api_key: Some("key".to_string()),
            base_url: "http://localhost:9999/".to_string(),
            results: 4,
            timeout_secs: Some(5),
            ..Default::default()
        };

        let client = SpoonacularClient::new(&config).unwrap();
        assert!(client.has_credential());
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.results, 4);
    }
}
