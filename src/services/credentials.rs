// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential store shared by all fetch workers.
//!
//! Holds a single token behind one lock. The first caller loads the token
//! file; whoever finds the held token expired refreshes it while still
//! holding the lock, so concurrent callers wait and reuse the result.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::cache::write_atomic;
use super::fault;
use super::transport::Transport;
use crate::error::AuthError;
use crate::models::Token;

enum TokenState {
    Unloaded,
    Ready(Token),
    /// Loading or refreshing failed. Later callers get the same message
    /// without touching the file or the token endpoint again.
    Failed(String),
}

/// Single-user OAuth token holder with single-flight refresh.
pub struct CredentialStore {
    transport: Arc<dyn Transport>,
    client_id: String,
    client_secret: String,
    token_url: String,
    token_path: PathBuf,
    state: Mutex<TokenState>,
}

impl CredentialStore {
    pub fn new(
        transport: Arc<dyn Transport>,
        client_id: String,
        client_secret: String,
        token_url: String,
        token_path: PathBuf,
    ) -> Self {
        Self {
            transport,
            client_id,
            client_secret,
            token_url,
            token_path,
            state: Mutex::new(TokenState::Unloaded),
        }
    }

    /// Get a valid (non-expired) access token, refreshing if needed.
    ///
    /// Callers must not cache the result across requests; call this before
    /// each request instead. A failure is final for the lifetime of the store.
    pub async fn get_access_token(&self) -> Result<String, AuthError> {
        let mut state = self.state.lock().await;

        let held = match &*state {
            TokenState::Ready(token) if !token.is_expired() => {
                return Ok(token.access_token.clone());
            }
            TokenState::Ready(token) => Some(token.clone()),
            TokenState::Failed(message) => return Err(AuthError::Unavailable(message.clone())),
            TokenState::Unloaded => None,
        };

        let current = match held {
            Some(token) => token,
            None => self.load().await.map_err(|e| record_failure(&mut state, e))?,
        };

        if !current.is_expired() {
            let access_token = current.access_token.clone();
            *state = TokenState::Ready(current);
            return Ok(access_token);
        }

        tracing::info!(expires_at = current.expires_at, "Access token expired, refreshing");
        let (token, body) = self
            .exchange(&current.refresh_token)
            .await
            .map_err(|e| record_failure(&mut state, e))?;

        // The old refresh token is spent now, so keep the new one even if
        // saving it fails.
        let access_token = token.access_token.clone();
        let expires_at = token.expires_at;
        *state = TokenState::Ready(token);

        self.persist(body).await?;
        tracing::info!(expires_at, "Token refreshed and saved");
        Ok(access_token)
    }

    /// Read the bootstrap/persisted token file.
    async fn load(&self) -> Result<Token, AuthError> {
        let data = tokio::fs::read(&self.token_path)
            .await
            .map_err(|source| AuthError::MissingCredentials {
                path: self.token_path.clone(),
                source,
            })?;
        let token: Token = serde_json::from_slice(&data)
            .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;
        tracing::debug!(path = %self.token_path.display(), "Loaded token");
        Ok(token)
    }

    /// Exchange the refresh token for a new token. Returns the token and the
    /// raw response body to persist.
    async fn exchange(&self, refresh_token: &str) -> Result<(Token, Vec<u8>), AuthError> {
        let response = self
            .transport
            .post_form(
                &self.token_url,
                &[
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                ],
            )
            .await
            .map_err(|e| AuthError::RefreshFailed(format!("Token refresh request failed: {}", e)))?;

        if let Some(message) = fault::fault_message(&response.body) {
            return Err(AuthError::RefreshFailed(format!(
                "Got an error response when updating token: {}",
                message
            )));
        }
        if !response.is_success() {
            return Err(AuthError::RefreshFailed(format!(
                "HTTP {}: {}",
                response.status,
                response.text()
            )));
        }

        let token: Token = serde_json::from_slice(&response.body)
            .map_err(|e| AuthError::RefreshFailed(format!("Couldn't parse token data: {}", e)))?;
        Ok((token, response.body))
    }

    /// Atomically replace the token file with `body`.
    async fn persist(&self, body: Vec<u8>) -> Result<(), AuthError> {
        let path = self.token_path.clone();
        let persist_err = |message: String| AuthError::Persist {
            path: self.token_path.clone(),
            message,
        };
        tokio::task::spawn_blocking(move || write_atomic(&path, &body))
            .await
            .map_err(|e| persist_err(e.to_string()))?
            .map_err(|e| persist_err(e.to_string()))
    }
}

fn record_failure(state: &mut TokenState, err: AuthError) -> AuthError {
    tracing::error!(error = %err, "Credentials unavailable");
    *state = TokenState::Failed(err.to_string());
    err
}
