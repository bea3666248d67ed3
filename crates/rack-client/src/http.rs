//! HTTP client for the rack server
//!
//! Every request carries the stored bearer token when one exists. A 401
//! clears the token so the UI falls back to the login screen. No retries:
//! the server owns consistency and the caller re-fetches after mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rack_domain::{
    Alert, AuthResponse, CareLog, CareLogDraft, CareLogId, CreateGecko, CreateRack, Gecko, GeckoId,
    LoginRequest, MoveGecko, Photo, PhotoId, Rack, RackId, RegisterRequest, SwapGeckos, SwapResult,
    UpdateGecko, UpdateRack, User,
};
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::api::PlacementApi;
use crate::config::ClientConfig;
use crate::error::{map_reqwest_error, ApiError};
use crate::token::TokenStore;

/// A photo file chosen by the user
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
    pub taken_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct HttpRackApi<S> {
    http: Client,
    config: ClientConfig,
    tokens: S,
}

impl<S: TokenStore> HttpRackApi<S> {
    pub fn new(config: ClientConfig, tokens: S) -> Result<Self, ApiError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(config.request_timeout)
            .user_agent(concat!("gecko-rack/", env!("CARGO_PKG_VERSION")));
        let http = builder.build().map_err(map_reqwest_error)?;

        Ok(Self { http, config, tokens })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    // ---- auth ----

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest { email, password };
        let auth: AuthResponse = self.fetch(self.request(Method::POST, "/auth/login").json(&body)).await?;
        self.tokens.save(&auth.token);
        info!(user_id = auth.user.id, "signed in");
        Ok(auth)
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse, ApiError> {
        let body = RegisterRequest { email, password, name };
        let auth: AuthResponse = self.fetch(self.request(Method::POST, "/auth/register").json(&body)).await?;
        self.tokens.save(&auth.token);
        info!(user_id = auth.user.id, "registered");
        Ok(auth)
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.fetch(self.request(Method::GET, "/auth/me")).await
    }

    /// Local only; the server keeps no session
    pub fn logout(&self) {
        self.tokens.clear();
        info!("signed out");
    }

    // ---- racks ----

    pub async fn get_racks(&self) -> Result<Vec<Rack>, ApiError> {
        self.fetch(self.request(Method::GET, "/racks")).await
    }

    pub async fn get_rack(&self, id: RackId) -> Result<Rack, ApiError> {
        self.fetch(self.request(Method::GET, &format!("/racks/{id}"))).await
    }

    pub async fn create_rack(&self, data: &CreateRack) -> Result<Rack, ApiError> {
        self.fetch(self.request(Method::POST, "/racks").json(data)).await
    }

    pub async fn update_rack(&self, id: RackId, data: &UpdateRack) -> Result<Rack, ApiError> {
        self.fetch(self.request(Method::PUT, &format!("/racks/{id}")).json(data)).await
    }

    pub async fn delete_rack(&self, id: RackId) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/racks/{id}"))).await?;
        Ok(())
    }

    // ---- geckos ----

    pub async fn get_geckos(&self) -> Result<Vec<Gecko>, ApiError> {
        self.fetch(self.request(Method::GET, "/geckos")).await
    }

    pub async fn get_gecko(&self, id: GeckoId) -> Result<Gecko, ApiError> {
        self.fetch(self.request(Method::GET, &format!("/geckos/{id}"))).await
    }

    pub async fn create_gecko(&self, data: &CreateGecko) -> Result<Gecko, ApiError> {
        self.fetch(self.request(Method::POST, "/geckos").json(data)).await
    }

    pub async fn update_gecko(&self, id: GeckoId, data: &UpdateGecko) -> Result<Gecko, ApiError> {
        self.fetch(self.request(Method::PUT, &format!("/geckos/{id}")).json(data)).await
    }

    pub async fn delete_gecko(&self, id: GeckoId) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/geckos/{id}"))).await?;
        Ok(())
    }

    pub async fn move_to(&self, id: GeckoId, target: &MoveGecko) -> Result<Gecko, ApiError> {
        self.fetch(self.request(Method::PATCH, &format!("/geckos/{id}/move")).json(target))
            .await
    }

    pub async fn swap(&self, first: GeckoId, second: GeckoId) -> Result<SwapResult, ApiError> {
        let body = SwapGeckos { gecko_id1: first, gecko_id2: second };
        self.fetch(self.request(Method::POST, "/geckos/swap").json(&body)).await
    }

    // ---- care logs ----

    pub async fn get_logs(&self, gecko_id: GeckoId) -> Result<Vec<CareLog>, ApiError> {
        self.fetch(self.request(Method::GET, &format!("/geckos/{gecko_id}/logs"))).await
    }

    pub async fn create_log(&self, gecko_id: GeckoId, draft: &CareLogDraft) -> Result<CareLog, ApiError> {
        self.fetch(self.request(Method::POST, &format!("/geckos/{gecko_id}/logs")).json(draft))
            .await
    }

    pub async fn delete_log(&self, id: CareLogId) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/logs/{id}"))).await?;
        Ok(())
    }

    // ---- photos ----

    pub async fn get_photos(&self, gecko_id: GeckoId) -> Result<Vec<Photo>, ApiError> {
        self.fetch(self.request(Method::GET, &format!("/geckos/{gecko_id}/photos"))).await
    }

    pub async fn upload_photo(&self, gecko_id: GeckoId, upload: PhotoUpload) -> Result<Photo, ApiError> {
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        let mut form = multipart::Form::new().part("photo", part);
        if let Some(taken_at) = upload.taken_at {
            form = form.text("takenAt", taken_at.to_rfc3339());
        }

        self.fetch(self.request(Method::POST, &format!("/geckos/{gecko_id}/photos")).multipart(form))
            .await
    }

    pub async fn set_main_photo(&self, id: PhotoId) -> Result<Photo, ApiError> {
        self.fetch(self.request(Method::PATCH, &format!("/photos/{id}/main"))).await
    }

    pub async fn delete_photo(&self, id: PhotoId) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/photos/{id}"))).await?;
        Ok(())
    }

    // ---- alerts ----

    pub async fn get_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        self.fetch(self.request(Method::GET, "/alerts")).await
    }

    // ---- plumbing ----

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "request");
        let builder = self.http.request(method, self.config.endpoint(path));
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let res = builder.send().await.map_err(|e| {
            let err = map_reqwest_error(e);
            warn!(error = %err, "request failed");
            err
        })?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let url = res.url().path().to_string();
        let body = res.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body);
        if err.is_unauthorized() {
            self.tokens.clear();
        }
        warn!(status = status.as_u16(), path = %url, error = %err, "request rejected");
        Err(err)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let res = self.execute(builder).await?;
        res.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl<S: TokenStore> PlacementApi for HttpRackApi<S> {
    async fn list_racks(&self) -> Result<Vec<Rack>, ApiError> {
        self.get_racks().await
    }

    async fn move_gecko(&self, id: GeckoId, target: &MoveGecko) -> Result<Gecko, ApiError> {
        self.move_to(id, target).await
    }

    async fn swap_geckos(&self, first: GeckoId, second: GeckoId) -> Result<SwapResult, ApiError> {
        self.swap(first, second).await
    }
}
