use std::net::SocketAddr;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::TempDir;

use server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig};
use server::state::AppState;

pub mod routes {
    pub const ITEMS: &str = "/api/items";
    pub const LOW_STOCK: &str = "/api/items/low-stock";
    pub const SKU: &str = "/api/items/sku";

    pub fn item(id: &str) -> String {
        format!("/api/items/{id}")
    }

    pub fn item_quantity(id: &str) -> String {
        format!("/api/items/{id}/quantity")
    }
}

/// Smallest payload the server accepts as a PNG upload (declared type wins).
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nPNG_DATA";

/// A running test server backed by in-memory SQLite and a scratch upload
/// directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub upload_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let upload_dir = TempDir::new().expect("Failed to create upload dir");

        let mut app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
                expose_internal_errors: false,
            },
            database: DatabaseConfig::new("sqlite::memory:"),
            storage: StorageConfig {
                upload_dir: upload_dir.path().to_path_buf(),
                public_prefix: "uploads".to_string(),
                max_upload_size: 64 * 1024,
            },
        };
        configure(&mut app_config);

        let state = AppState::from_config(app_config)
            .await
            .expect("Failed to build app state");
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            upload_dir,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn items_client(&self) -> client::ItemsClient {
        client::ItemsClient::new(&self.base_url()).expect("Failed to build items client")
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Fetch raw bytes (for served uploads).
    pub async fn get_bytes(&self, path: &str) -> (u16, Vec<u8>) {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        let status = res.status().as_u16();
        let bytes = res.bytes().await.unwrap_or_default().to_vec();
        (status, bytes)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, content_type: &str, body: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn post_multipart(&self, path: &str, form: Form) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put_multipart(&self, path: &str, form: Form) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart PUT request");

        TestResponse::from_response(res).await
    }

    /// Create an item via the JSON API and return its `id`.
    pub async fn create_item(&self, body: &Value) -> String {
        let res = self.post_json(routes::ITEMS, body).await;
        assert_eq!(res.status, 201, "create_item failed: {}", res.text);
        res.id()
    }

    /// Number of stored files in the upload directory (ignoring the temp dir).
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload dir")
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .count()
    }

    /// Wait for background attachment cleanup to remove `image_url`'s file.
    pub async fn wait_for_removal(&self, image_url: &str) -> bool {
        let path = self
            .upload_dir
            .path()
            .join(image_url.trim_start_matches("uploads/"));
        for _ in 0..50 {
            if !path.exists() {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        false
    }
}

/// A multipart image part.
pub fn image_part(file_name: &str, mime: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str(mime)
        .expect("Failed to set MIME type")
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn id(&self) -> String {
        self.body["data"]["id"]
            .as_str()
            .expect("response body should contain 'data.id'")
            .to_string()
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}
