//! Supabase auth adapter over the GoTrue REST API.
//!
//! Implements `AuthBackend` by calling the project's `/auth/v1` endpoints
//! with the anon key. The access and refresh tokens obtained at sign-in are
//! kept here and never leave the adapter.
//!
//! # Session refresh
//!
//! `get_session` refreshes a session that expires within
//! `REFRESH_MARGIN_SECS` and emits `TOKEN_REFRESHED`. A failed refresh ends
//! the session and emits `SIGNED_OUT`.
//!
//! # Example
//!
//! ```ignore
//! let config = SupabaseAuthConfig::new("https://xyz.supabase.co", anon_key);
//! let backend = SupabaseAuthClient::new(config)?;
//! let session = backend.sign_in_with_password("sara@example.com", "secret").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::foundation::{
    AuthChangeEvent, AuthError, AuthSession, AuthStateChange, Timestamp, UserId,
};
use crate::ports::{AuthBackend, AuthStateStream, SignUpRequest};

use super::notifier::AuthStateNotifier;

const REFRESH_MARGIN_SECS: i64 = 30;

/// Configuration for the Supabase auth adapter.
#[derive(Debug, Clone)]
pub struct SupabaseAuthConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub project_url: String,
    anon_key: Secret<String>,
    pub timeout: Duration,
}

impl SupabaseAuthConfig {
    pub fn new(project_url: impl Into<String>, anon_key: Secret<String>) -> Self {
        Self {
            project_url: project_url.into(),
            anon_key,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.project_url.trim_end_matches('/'), path)
    }
}

/// A session together with the tokens that back it.
struct StoredSession {
    session: AuthSession,
    access_token: Secret<String>,
    refresh_token: Secret<String>,
}

/// Supabase GoTrue client.
pub struct SupabaseAuthClient {
    config: SupabaseAuthConfig,
    client: Client,
    current: RwLock<Option<StoredSession>>,
    notifier: AuthStateNotifier,
}

impl SupabaseAuthClient {
    pub fn new(config: SupabaseAuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                AuthError::service_unavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            client,
            current: RwLock::new(None),
            notifier: AuthStateNotifier::default(),
        })
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", self.config.anon_key.expose_secret())
            .header("Content-Type", "application/json")
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, AuthError> {
        self.request(builder).send().await.map_err(|e| {
            if e.is_timeout() {
                AuthError::Timeout
            } else {
                AuthError::service_unavailable(e.to_string())
            }
        })
    }

    /// Exchanges a grant for a token and stores the resulting session.
    async fn token_grant(
        &self,
        grant_type: &str,
        body: &impl Serialize,
    ) -> Result<TokenResponse, AuthError> {
        let url = self.config.auth_url(&format!("token?grant_type={}", grant_type));
        let response = self.send(self.client.post(url).json(body)).await?;

        match response.status() {
            status if status.is_success() => response
                .json::<TokenResponse>()
                .await
                .map_err(|e| AuthError::service_unavailable(format!("Invalid token response: {}", e))),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials),
            status => Err(Self::unavailable(status, response).await),
        }
    }

    async fn unavailable(status: StatusCode, response: Response) -> AuthError {
        let body = response.text().await.unwrap_or_default();
        AuthError::service_unavailable(format!("{}: {}", status, GoTrueError::message_from(&body)))
    }

    async fn store(&self, tokens: TokenResponse) -> Result<AuthSession, AuthError> {
        let session = tokens.to_session()?;
        *self.current.write().await = Some(StoredSession {
            session: session.clone(),
            access_token: Secret::new(tokens.access_token),
            refresh_token: Secret::new(tokens.refresh_token),
        });
        Ok(session)
    }

    async fn clear(&self) {
        *self.current.write().await = None;
        self.notifier.publish(AuthStateChange::signed_out());
    }

    async fn refresh(&self, refresh_token: Secret<String>) -> Result<AuthSession, AuthError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        };
        let tokens = self.token_grant("refresh_token", &body).await?;
        let session = self.store(tokens).await?;
        self.notifier.publish(AuthStateChange {
            event: AuthChangeEvent::TokenRefreshed,
            session: Some(session.clone()),
        });
        Ok(session)
    }
}

fn expires_soon(session: &AuthSession) -> bool {
    session
        .expires_at
        .as_ref()
        .is_some_and(|exp| Timestamp::now().plus_secs(REFRESH_MARGIN_SECS).is_after(exp))
}

#[async_trait]
impl AuthBackend for SupabaseAuthClient {
    async fn get_session(&self) -> Result<Option<AuthSession>, AuthError> {
        let refresh_token = {
            let current = self.current.read().await;
            match current.as_ref() {
                None => return Ok(None),
                Some(stored) if !expires_soon(&stored.session) => {
                    return Ok(Some(stored.session.clone()))
                }
                Some(stored) => stored.refresh_token.clone(),
            }
        };

        match self.refresh(refresh_token).await {
            Ok(session) => Ok(Some(session)),
            Err(err) if err.is_transient() => Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "Session refresh rejected, signing out");
                self.clear().await;
                Ok(None)
            }
        }
    }

    fn subscribe(&self) -> AuthStateStream {
        self.notifier.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let access_token = self
            .current
            .read()
            .await
            .as_ref()
            .map(|stored| stored.access_token.clone());

        if let Some(token) = access_token {
            let builder = self
                .client
                .post(self.config.auth_url("logout"))
                .bearer_auth(token.expose_secret());
            match self.send(builder).await {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(status = %response.status(), "Logout rejected by auth service");
                }
                Err(err) => tracing::warn!(error = %err, "Logout request failed"),
                Ok(_) => {}
            }
        }

        // The local session ends whatever the service answered.
        self.clear().await;
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let tokens = self
            .token_grant("password", &PasswordGrant { email, password })
            .await?;
        let session = self.store(tokens).await?;
        tracing::info!(user_id = %session.user_id, "Signed in");
        self.notifier
            .publish(AuthStateChange::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<AuthSession, AuthError> {
        let body = SignUpBody {
            email: &request.email,
            password: &request.password,
            data: SignUpMetadata {
                username: &request.username,
            },
        };
        let response = self
            .send(self.client.post(self.config.auth_url("signup")).json(&body))
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::RegistrationRejected(GoTrueError::message_from(&body)));
        }
        if !status.is_success() {
            return Err(Self::unavailable(status, response).await);
        }

        let body: SignUpResponse = response
            .json()
            .await
            .map_err(|e| AuthError::service_unavailable(format!("Invalid sign-up response: {}", e)))?;

        // Without an access token the project requires email confirmation.
        let tokens = match body {
            SignUpResponse::Session(tokens) => tokens,
            SignUpResponse::PendingConfirmation(user) => {
                tracing::info!(user_id = %user.id, "Registered, awaiting email confirmation");
                return Err(AuthError::ConfirmationRequired);
            }
        };
        let session = self.store(tokens).await?;
        tracing::info!(user_id = %session.user_id, "Registered");
        self.notifier
            .publish(AuthStateChange::signed_in(session.clone()));
        Ok(session)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// GoTrue API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    username: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: GoTrueUser,
}

impl TokenResponse {
    fn to_session(&self) -> Result<AuthSession, AuthError> {
        let user_id = UserId::new(self.user.id.clone())
            .map_err(|e| AuthError::service_unavailable(format!("Invalid user id: {}", e)))?;
        let mut session = AuthSession::new(user_id);
        if let Some(email) = &self.user.email {
            session = session.with_email(email.clone());
        }
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(at), _) => Timestamp::from_unix_secs(at),
            (None, Some(secs)) => Some(Timestamp::now().plus_secs(secs)),
            (None, None) => None,
        };
        if let Some(expires_at) = expires_at {
            session = session.with_expiry(expires_at);
        }
        Ok(session)
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    PendingConfirmation(GoTrueUser),
}

#[derive(Debug, Deserialize)]
struct GoTrueError {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl GoTrueError {
    fn message_from(body: &str) -> String {
        serde_json::from_str::<GoTrueError>(body)
            .ok()
            .and_then(|e| e.msg.or(e.error_description).or(e.message))
            .unwrap_or_else(|| body.to_string())
    }
}
