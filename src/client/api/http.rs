//! HTTP API Client
//!
//! reqwest implementation of the feedback server's REST API. Every
//! authenticated call sends `Authorization: Bearer <token>`; the caller
//! supplies the token so this type never reads the session itself.

use super::ApiGateway;
use crate::client::config::Config;
use crate::client::error::{ClientError, ClientResult};
use crate::client::offline::FlatRecord;
use crate::shared::{
    AdminFeedbackItem, AnalyticsResponse, AuthResponse, ConfigError, FeedbackItem,
    FeedbackRequest, FeedbackResponse, FeedbackTemplate, ForgotPasswordRequest, LoginRequest,
    MessageResponse, ModerationStatus, NotificationItem, NotificationRequest, RegisterRequest,
    ResetPasswordRequest, TemplateRequest, UserProfile, UserUpdate,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// REST client for the feedback server
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    config: Config,
    client: Client,
}

impl HttpApiClient {
    pub fn new(config: Config) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- auth ----

    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.send_json(self.client.post(self.url("auth/forgot-password")?).json(&request))
            .await
    }

    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> ClientResult<MessageResponse> {
        let request = ResetPasswordRequest {
            token: reset_token.to_string(),
            new_password: new_password.to_string(),
        };
        self.send_json(self.client.post(self.url("auth/reset-password")?).json(&request))
            .await
    }

    // ---- feedback ----

    pub async fn feedback_history(&self, token: &str) -> ClientResult<Vec<FeedbackItem>> {
        let request = self.authorized(self.client.get(self.url("feedback/myfeedback")?), token);
        self.send_json(request).await
    }

    /// Question template of one category
    pub async fn feedback_template(
        &self,
        token: &str,
        category: &str,
    ) -> ClientResult<FeedbackTemplate> {
        let url = self.url_with_segment("admin/feedback-template", category)?;
        self.send_json(self.authorized(self.client.get(url), token)).await
    }

    // ---- templates ----

    pub async fn list_templates(&self, token: &str) -> ClientResult<Vec<FeedbackTemplate>> {
        let request = self.authorized(self.client.get(self.url("admin/feedback-templates")?), token);
        self.send_json(request).await
    }

    pub async fn create_template(&self, token: &str, template: &TemplateRequest) -> ClientResult<()> {
        let request = self
            .authorized(self.client.post(self.url("admin/feedback-template")?), token)
            .json(template);
        self.send_empty(request).await
    }

    pub async fn update_template(
        &self,
        token: &str,
        category: &str,
        template: &TemplateRequest,
    ) -> ClientResult<()> {
        let url = self.url_with_segment("admin/feedback-template", category)?;
        self.send_empty(self.authorized(self.client.put(url), token).json(template))
            .await
    }

    pub async fn delete_template(&self, token: &str, category: &str) -> ClientResult<()> {
        let url = self.url_with_segment("admin/feedback-template", category)?;
        self.send_empty(self.authorized(self.client.delete(url), token)).await
    }

    // ---- moderation ----

    pub async fn all_feedback(&self, token: &str) -> ClientResult<Vec<AdminFeedbackItem>> {
        let request = self.authorized(self.client.get(self.url("admin/feedback/all")?), token);
        self.send_json(request).await
    }

    pub async fn moderate_feedback(
        &self,
        token: &str,
        feedback_id: &str,
        status: ModerationStatus,
    ) -> ClientResult<AdminFeedbackItem> {
        let url = self.url_with_segment("admin/feedback", feedback_id)?;
        let body = serde_json::json!({ "status": status.as_str() });
        self.send_json(self.authorized(self.client.put(url), token).json(&body))
            .await
    }

    pub async fn delete_feedback(&self, token: &str, feedback_id: &str) -> ClientResult<()> {
        let url = self.url_with_segment("admin/feedback", feedback_id)?;
        self.send_empty(self.authorized(self.client.delete(url), token)).await
    }

    // ---- profile & users ----

    pub async fn profile(&self, token: &str) -> ClientResult<UserProfile> {
        self.send_json(self.authorized(self.client.get(self.url("profile")?), token))
            .await
    }

    pub async fn update_profile(&self, token: &str, profile: &UserProfile) -> ClientResult<()> {
        let request = self
            .authorized(self.client.put(self.url("profile")?), token)
            .json(profile);
        self.send_empty(request).await
    }

    pub async fn list_users(&self, token: &str) -> ClientResult<Vec<UserProfile>> {
        self.send_json(self.authorized(self.client.get(self.url("admin/users")?), token))
            .await
    }

    pub async fn update_user(
        &self,
        token: &str,
        user_id: &str,
        update: &UserUpdate,
    ) -> ClientResult<UserProfile> {
        let url = self.url_with_segment("admin/users", user_id)?;
        self.send_json(self.authorized(self.client.put(url), token).json(update))
            .await
    }

    pub async fn delete_user(&self, token: &str, user_id: &str) -> ClientResult<()> {
        let url = self.url_with_segment("admin/users", user_id)?;
        self.send_empty(self.authorized(self.client.delete(url), token)).await
    }

    // ---- analytics & notifications ----

    pub async fn analytics(&self, token: &str) -> ClientResult<AnalyticsResponse> {
        self.send_json(self.authorized(self.client.get(self.url("analytics")?), token))
            .await
    }

    pub async fn send_notification(
        &self,
        token: &str,
        notification: &NotificationRequest,
    ) -> ClientResult<MessageResponse> {
        let request = self
            .authorized(self.client.post(self.url("notifications/")?), token)
            .json(notification);
        self.send_json(request).await
    }

    pub async fn all_notifications(&self, token: &str) -> ClientResult<Vec<NotificationItem>> {
        let request = self.authorized(self.client.get(self.url("notifications/all")?), token);
        self.send_json(request).await
    }

    pub async fn my_notifications(&self, token: &str) -> ClientResult<Vec<NotificationItem>> {
        let request = self.authorized(self.client.get(self.url("notifications/my")?), token);
        self.send_json(request).await
    }

    // ---- plumbing ----

    fn url(&self, path: &str) -> ClientResult<Url> {
        let raw = self.config.api_url(path);
        Url::parse(&raw).map_err(|_| ClientError::Config(ConfigError::InvalidUrl(raw)))
    }

    /// `path` followed by one percent-encoded segment (ids, category names)
    fn url_with_segment(&self, path: &str, segment: &str) -> ClientResult<Url> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(ConfigError::InvalidUrl(self.config.api_url(path))))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header("Authorization", format!("Bearer {}", token))
    }

    async fn execute(&self, request: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            tracing::debug!("Request failed: {} - {}", status, body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::Decode(format!("Failed to parse response: {}", e)))
    }

    /// Success status is all that matters; any body is ignored
    async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        self.execute(request).await.map(|_| ())
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.request_timeout())
        } else {
            ClientError::from(err)
        }
    }

    fn request_timeout(&self) -> Duration {
        self.config.request_timeout()
    }
}

#[async_trait]
impl ApiGateway for HttpApiClient {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.send_json(self.client.post(self.url("auth/login")?).json(request))
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.send_json(self.client.post(self.url("auth/register")?).json(request))
            .await
    }

    async fn logout(&self, token: &str) -> ClientResult<()> {
        self.send_empty(self.authorized(self.client.post(self.url("auth/logout")?), token))
            .await
    }

    async fn submit_feedback(
        &self,
        token: &str,
        request: &FeedbackRequest,
    ) -> ClientResult<FeedbackResponse> {
        let builder = self
            .authorized(self.client.post(self.url("feedback")?), token)
            .json(request);
        self.send_json(builder).await
    }

    async fn sync_offline_feedback(&self, token: &str, records: &[FlatRecord]) -> ClientResult<()> {
        let request = self
            .authorized(self.client.post(self.url("sync")?), token)
            .json(records);
        self.send_empty(request).await
    }
}
