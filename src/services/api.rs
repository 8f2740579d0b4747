use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;
use crate::models::types::{
    AddPlayerRequest, AnalyticsResponse, ApiKeyRequest, ApiResponse, ErrorBody, PlayerList,
    RecentGamesResponse, RegionRequest, RemovePlayerRequest,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// The dashboard backend as seen by a client session.
pub trait Backend: Send + Sync {
    fn set_api_key(
        &self,
        api_key: &str,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    fn add_player(
        &self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    fn add_pro_players(
        &self,
        region: &str,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    fn remove_player(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    fn start_monitoring(&self) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    fn stop_monitoring(&self) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    fn get_players(&self) -> impl Future<Output = Result<PlayerList, ClientError>> + Send;

    fn get_analytics(&self) -> impl Future<Output = Result<AnalyticsResponse, ClientError>> + Send;

    fn get_recent_games(
        &self,
        puuid: &str,
    ) -> impl Future<Output = Result<RecentGamesResponse, ClientError>> + Send;
}

/// HTTP implementation of [`Backend`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        tracing::debug!("POST {}", path);
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        decode(request.send().await?).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        tracing::debug!("GET {}", path);
        decode(self.http.get(self.url(path)).send().await?).await
    }
}

/// Non-2xx answers become `Backend` errors when they carry `{"error": ...}`,
/// transport errors otherwise. Their bodies are never decoded as `T`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status_error = response.error_for_status_ref().err();
    if let Some(status_error) = status_error {
        let text = response.text().await.unwrap_or_default();
        return Err(match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => ClientError::Backend(body.error),
            Err(_) => ClientError::Transport(status_error),
        });
    }

    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

impl Backend for ApiClient {
    async fn set_api_key(&self, api_key: &str) -> Result<ApiResponse, ClientError> {
        self.post("/api/set_api_key", Some(&ApiKeyRequest { api_key }))
            .await
    }

    async fn add_player(
        &self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> Result<ApiResponse, ClientError> {
        let body = AddPlayerRequest {
            game_name,
            tag_line,
            region,
        };
        self.post("/api/add_player", Some(&body)).await
    }

    async fn add_pro_players(&self, region: &str) -> Result<ApiResponse, ClientError> {
        self.post("/api/add_pro_players", Some(&RegionRequest { region }))
            .await
    }

    async fn remove_player(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<ApiResponse, ClientError> {
        let body = RemovePlayerRequest {
            game_name,
            tag_line,
        };
        self.post("/api/remove_player", Some(&body)).await
    }

    async fn start_monitoring(&self) -> Result<ApiResponse, ClientError> {
        self.post::<(), _>("/api/start_monitoring", None).await
    }

    async fn stop_monitoring(&self) -> Result<ApiResponse, ClientError> {
        self.post::<(), _>("/api/stop_monitoring", None).await
    }

    async fn get_players(&self) -> Result<PlayerList, ClientError> {
        self.get("/api/get_players").await
    }

    async fn get_analytics(&self) -> Result<AnalyticsResponse, ClientError> {
        self.get("/api/get_analytics_data").await
    }

    async fn get_recent_games(&self, puuid: &str) -> Result<RecentGamesResponse, ClientError> {
        self.get(&format!("/api/get_recent_games/{}", puuid)).await
    }
}
