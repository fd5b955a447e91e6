//! Authentication Service
//!
//! Login, registration and logout on top of the session store, plus the
//! account calls a logged-in user makes about themselves (profile,
//! personal notifications).

use crate::client::api::{ApiGateway, HttpApiClient};
use crate::client::error::{ClientError, ClientResult};
use crate::client::session::SessionStore;
use crate::client::sync::SyncCoordinator;
use crate::shared::{
    require_non_empty, AuthResponse, LoginRequest, MessageResponse, NotificationItem,
    RegisterRequest, UserProfile,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthService {
    session: SessionStore,
    gateway: Arc<dyn ApiGateway>,
    http: Arc<HttpApiClient>,
    sync: Arc<SyncCoordinator>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        session: SessionStore,
        gateway: Arc<dyn ApiGateway>,
        http: Arc<HttpApiClient>,
        sync: Arc<SyncCoordinator>,
    ) -> Self {
        Self {
            session,
            gateway,
            http,
            sync,
        }
    }

    /// Login user with email and password; the session is saved on success
    ///
    /// When online, feedback queued while logged out is synced before this
    /// returns. A failed sync is logged and leaves the login intact.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        require_non_empty("email", email)?;
        require_non_empty("password", password)?;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.gateway.login(&request).await.map_err(|e| {
            tracing::warn!("Login failed for {}: {}", request.email, e);
            e
        })?;

        self.session
            .save_session(&response.token, response.is_admin)
            .await?;
        tracing::info!("Logged in as {} (admin: {})", response.email, response.is_admin);

        if self.sync.monitor().is_online() {
            let outcome = self.sync.sync().await;
            if outcome.is_failure() {
                tracing::warn!("Post-login sync did not complete: {:?}", outcome);
            }
        }
        Ok(response)
    }

    /// Create an account; does not log in
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<AuthResponse> {
        require_non_empty("name", name)?;
        require_non_empty("email", email)?;
        require_non_empty("password", password)?;

        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.gateway.register(&request).await?;
        tracing::info!("Registered account for {}", response.email);
        Ok(response)
    }

    /// End the session
    ///
    /// The local session is always cleared, even if the server call fails;
    /// that failure is returned afterwards. Calling it while logged out is
    /// a no-op.
    pub async fn logout(&self) -> ClientResult<()> {
        let server_result = match self.session.get_token().await? {
            Some(token) => self.gateway.logout(&token).await,
            None => Ok(()),
        };

        self.session.logout().await?;

        if let Err(e) = &server_result {
            tracing::warn!("Server logout failed; local session cleared anyway: {}", e);
        }
        server_result
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        require_non_empty("email", email)?;
        self.http.forgot_password(email.trim()).await
    }

    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> ClientResult<MessageResponse> {
        require_non_empty("token", reset_token)?;
        require_non_empty("new_password", new_password)?;
        self.http.reset_password(reset_token.trim(), new_password).await
    }

    pub async fn is_logged_in(&self) -> ClientResult<bool> {
        self.session.is_logged_in().await
    }

    pub async fn is_admin(&self) -> ClientResult<bool> {
        self.session.is_admin().await
    }

    pub async fn profile(&self) -> ClientResult<UserProfile> {
        let token = self.require_token().await?;
        self.http.profile(&token).await
    }

    pub async fn update_profile(&self, profile: &UserProfile) -> ClientResult<()> {
        require_non_empty("name", &profile.name)?;
        require_non_empty("email", &profile.email)?;
        let token = self.require_token().await?;
        self.http.update_profile(&token, profile).await
    }

    /// Notifications addressed to the current user
    pub async fn notifications(&self) -> ClientResult<Vec<NotificationItem>> {
        let token = self.require_token().await?;
        self.http.my_notifications(&token).await
    }

    async fn require_token(&self) -> ClientResult<String> {
        self.session.get_token().await?.ok_or(ClientError::NotAuthenticated)
    }
}
