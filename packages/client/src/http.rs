use std::time::Duration;

use common::{Envelope, Item};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::draft::{ImageFile, ItemDraft};
use crate::error::{ClientError, ClientResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure body sent by the server.
#[derive(Deserialize)]
struct ErrorEnvelope {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct SkuSuggestion {
    sku: String,
}

/// HTTP client for `/api/items`.
#[derive(Debug, Clone)]
pub struct ItemsClient {
    http: Client,
    base_url: Url,
}

impl ItemsClient {
    /// Client for a server root such as `http://localhost:5000`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// `{base}/api/items/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "items"])
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        Ok(self.http.request(method, self.url(segments)?))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(body) => (body.code, body.message),
                Err(_) => (None, None),
            };
            debug!(status = status.as_u16(), ?code, "Request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                code,
                message: message.unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("{e}: {text}")))?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("response has no data".into()))
    }

    pub async fn list(&self) -> ClientResult<Vec<Item>> {
        self.send(self.request(Method::GET, &[])?).await
    }

    pub async fn low_stock(&self) -> ClientResult<Vec<Item>> {
        self.send(self.request(Method::GET, &["low-stock"])?).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Item> {
        self.send(self.request(Method::GET, &[id])?).await
    }

    pub async fn create(&self, draft: &ItemDraft) -> ClientResult<Item> {
        self.send(self.request(Method::POST, &[])?.json(draft)).await
    }

    pub async fn create_with_image(&self, draft: &ItemDraft, image: ImageFile) -> ClientResult<Item> {
        let form = draft.to_form(image)?;
        self.send(self.request(Method::POST, &[])?.multipart(form))
            .await
    }

    pub async fn update(&self, id: &str, draft: &ItemDraft) -> ClientResult<Item> {
        self.send(self.request(Method::PUT, &[id])?.json(draft)).await
    }

    pub async fn update_with_image(
        &self,
        id: &str,
        draft: &ItemDraft,
        image: ImageFile,
    ) -> ClientResult<Item> {
        let form = draft.to_form(image)?;
        self.send(self.request(Method::PUT, &[id])?.multipart(form))
            .await
    }

    pub async fn update_quantity(&self, id: &str, quantity: i64) -> ClientResult<Item> {
        let body = json!({ "quantity": quantity });
        self.send(self.request(Method::PATCH, &[id, "quantity"])?.json(&body))
            .await
    }

    /// Delete an item, returning the removed record.
    pub async fn delete(&self, id: &str) -> ClientResult<Item> {
        self.send(self.request(Method::DELETE, &[id])?).await
    }

    /// Ask the server for a SKU suggestion. The value is not reserved.
    pub async fn generate_sku(&self, prefix: Option<&str>) -> ClientResult<String> {
        let mut req = self.request(Method::GET, &["sku"])?;
        if let Some(prefix) = prefix {
            req = req.query(&[("prefix", prefix)]);
        }
        let suggestion: SkuSuggestion = self.send(req).await?;
        Ok(suggestion.sku)
    }
}
