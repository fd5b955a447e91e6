//! # Session Store
//!
//! Owns the persisted bearer token, the logged-in flag and the admin flag.
//!
//! ## Lifecycle
//!
//! `LoggedOut -> save_session -> LoggedIn -> (logout | expiry purge) -> LoggedOut`
//!
//! All three keys are written in one batch and removed in one batch, so a
//! reader never sees a token from one session next to the admin flag of
//! another.
//!
//! ## Expiry
//!
//! Reads are side-effect free: [`SessionStore::is_session_valid`],
//! [`SessionStore::is_logged_in`], [`SessionStore::is_admin`] and
//! [`SessionStore::stored_token`] never modify the store. Purging stale
//! credentials is explicit through [`SessionStore::purge_expired_session`].
//! [`SessionStore::get_token`] is the one accessor that purges first; every
//! caller about to make an authenticated request uses it.

use crate::client::error::ClientResult;
use crate::client::local_store::{KeyValueStore, KEY_IS_ADMIN, KEY_IS_LOGGED_IN, KEY_USER_TOKEN};
use crate::client::token;
use std::sync::Arc;

const SESSION_KEYS: [&str; 3] = [KEY_USER_TOKEN, KEY_IS_LOGGED_IN, KEY_IS_ADMIN];

/// Persisted authentication state
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist a freshly issued token together with its role
    pub async fn save_session(&self, token: &str, is_admin: bool) -> ClientResult<()> {
        tracing::info!(
            "Saving user session: token={}, is_admin={}",
            token::redact(token),
            is_admin
        );
        self.store
            .set_many(&[
                (KEY_USER_TOKEN, token),
                (KEY_IS_LOGGED_IN, bool_str(true)),
                (KEY_IS_ADMIN, bool_str(is_admin)),
            ])
            .await
    }

    /// Raw stored token, expired or not
    pub async fn stored_token(&self) -> ClientResult<Option<String>> {
        self.store.get(KEY_USER_TOKEN).await
    }

    /// True when a token is stored and has not expired
    pub async fn is_session_valid(&self) -> ClientResult<bool> {
        Ok(match self.stored_token().await? {
            Some(token) => !token::is_expired(&token),
            None => false,
        })
    }

    /// Clear the session if its token is expired or unreadable
    ///
    /// Returns `true` when something was purged.
    pub async fn purge_expired_session(&self) -> ClientResult<bool> {
        match self.stored_token().await? {
            Some(token) if token::is_expired(&token) => {
                tracing::warn!("Token has expired; clearing user session");
                self.clear_session_keys().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Token for an authenticated request
    ///
    /// Purges an expired session first, so `None` means "log in again".
    pub async fn get_token(&self) -> ClientResult<Option<String>> {
        self.purge_expired_session().await?;
        self.stored_token().await
    }

    /// Persisted role flag, independent of token freshness
    pub async fn is_admin(&self) -> ClientResult<bool> {
        self.read_flag(KEY_IS_ADMIN).await
    }

    /// Logged-in flag set and token still valid
    pub async fn is_logged_in(&self) -> ClientResult<bool> {
        Ok(self.read_flag(KEY_IS_LOGGED_IN).await? && self.is_session_valid().await?)
    }

    /// Remove every session key; calling it twice is harmless
    pub async fn logout(&self) -> ClientResult<()> {
        tracing::info!("Clearing user session");
        self.clear_session_keys().await
    }

    async fn clear_session_keys(&self) -> ClientResult<()> {
        self.store.remove_many(&SESSION_KEYS).await
    }

    async fn read_flag(&self, key: &str) -> ClientResult<bool> {
        Ok(self.store.get(key).await?.as_deref() == Some("true"))
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
