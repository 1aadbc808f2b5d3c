//! Client for the upstream marketplace API.

use persona_bundle::SaveBundleRequest;
use persona_page::{LoginRequest, RegisterRequest};
use persona_story::{FollowSync, LikeSync};
use serde::Deserialize;

#[derive(Debug)]
pub enum ApiError {
    /// Non-success HTTP status with whatever body text came back.
    Status(u16, String),
    Transport(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code, body) => write!(f, "status {}: {}", code, body),
            Self::Transport(e) => write!(f, "transport: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status(401, _))
    }
}

#[derive(Debug, Deserialize)]
struct SaveBundleResponse {
    bundle_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base: String) -> Self {
        Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ApiError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base, path))
            .json(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status(status, text));
        }
        Ok(resp)
    }

    pub async fn save_bundle(&self, req: &SaveBundleRequest) -> Result<u64, ApiError> {
        let resp = self.post_json("/api/bundle/save", req).await?;
        let body: SaveBundleResponse = resp.json().await?;
        Ok(body.bundle_id)
    }

    /// Quick-add from the story widget.
    pub async fn add_product(&self, product_id: u32) -> Result<(), ApiError> {
        let body = serde_json::json!({ "product_id": product_id });
        self.post_json("/api/bundle/add", &body).await?;
        Ok(())
    }

    pub async fn sync_like(&self, payload: &LikeSync) -> Result<(), ApiError> {
        self.post_json("/api/story/like", payload).await?;
        Ok(())
    }

    pub async fn sync_follow(&self, payload: &FollowSync) -> Result<(), ApiError> {
        self.post_json("/api/artisan/follow", payload).await?;
        Ok(())
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let resp = self.post_json("/login", req).await?;
        Ok(resp.json().await?)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let resp = self.post_json("/register", req).await?;
        Ok(resp.json().await?)
    }
}
