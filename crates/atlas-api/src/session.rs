//! # Session Lifecycle
//!
//! Login, claims decoding, and transparent token refresh.
//!
//! ## Token Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Lifecycle                                 │
//! │                                                                         │
//! │  login(username, password)                                              │
//! │       │  POST api/token/  →  { access, refresh }                        │
//! │       ▼                                                                 │
//! │  decode claims ONCE ──► SessionContext { username, groups, expires_at } │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  access token ──► bearer slot (shared with every resource accessor)    │
//! │                                                                         │
//! │  ensure_fresh()            called before command work                   │
//! │       │                                                                 │
//! │       ├─ expires far away ──► no-op                                     │
//! │       └─ inside margin ─────► POST api/token/refresh/ → new access     │
//! │                                   │                                     │
//! │                                   └─ failure ──► session cleared,      │
//! │                                                  caller re-logs in     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Claims
//! The backend embeds `username` and `groups` (role names) into the access
//! token alongside the standard `exp`. The client holds no signing key, so
//! the token is decoded without signature verification; it is trusted only
//! for UI gating, never as a security boundary (the backend re-checks every
//! request).

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use atlas_core::session::SessionContext;

use crate::error::{ApiError, ApiResult};
use crate::http::HttpClient;

/// Seconds before expiry at which the access token is refreshed.
///
/// The margin keeps a request issued right at the boundary from racing
/// the backend's expiry check.
const REFRESH_MARGIN_SECS: i64 = 60;

// =============================================================================
// Wire Shapes
// =============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

/// The claims the backend embeds in an access token.
///
/// `username` and `groups` are custom claims; older tokens may lack them,
/// so both are optional and fall back at the call site.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    groups: Option<Vec<String>>,
    exp: i64,
}

/// The tokens held for the current session.
///
/// The access token itself lives in the transport's bearer slot; this
/// keeps only what the refresh path needs.
#[derive(Debug, Clone)]
struct TokenSet {
    refresh: String,
    context: SessionContext,
}

// =============================================================================
// Session Manager
// =============================================================================

/// Owns the login/refresh lifecycle for one backend connection.
///
/// Cheap to clone; all clones share the same token state.
#[derive(Debug, Clone)]
pub struct SessionManager {
    http: HttpClient,
    tokens: Arc<RwLock<Option<TokenSet>>>,
}

impl SessionManager {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self {
            http,
            tokens: Arc::new(RwLock::new(None)),
        }
    }

    /// Authenticates against the backend and establishes a session.
    ///
    /// On success the access token is attached to the shared transport and
    /// its claims are decoded once into the returned [`SessionContext`].
    ///
    /// ## Errors
    /// - [`ApiError::Rejected`] with the backend's message on bad credentials
    /// - [`ApiError::Decode`] if the access token's claims are unreadable
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<SessionContext> {
        let url = self.http.endpoint("api/token/")?;
        let pair: TokenPair = self
            .http
            .post_expect(url, &LoginRequest { username, password }, StatusCode::OK)
            .await?;

        let context = decode_context(&pair.access, username)?;
        self.http.set_bearer(Some(pair.access)).await;
        *self.tokens.write().await = Some(TokenSet {
            refresh: pair.refresh,
            context: context.clone(),
        });

        debug!(
            username = %context.username,
            groups = ?context.groups,
            expires_at = context.expires_at,
            "session established"
        );
        Ok(context)
    }

    /// The decoded context of the current session, if any.
    pub async fn context(&self) -> Option<SessionContext> {
        self.tokens.read().await.as_ref().map(|t| t.context.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    /// Drops the session locally.
    ///
    /// The backend keeps no server-side session to invalidate; forgetting
    /// the tokens is the whole operation.
    pub async fn logout(&self) {
        *self.tokens.write().await = None;
        self.http.set_bearer(None).await;
        debug!("session cleared");
    }

    /// Guarantees the access token outlives the next request.
    ///
    /// Fast path: a read-lock check against the expiry margin. Slow path:
    /// re-check under the write lock (another task may have refreshed while
    /// this one waited), then exchange the refresh token for a new access
    /// token. A failed refresh clears the session so the caller lands on
    /// the login screen instead of looping on 401s.
    pub async fn ensure_fresh(&self) -> ApiResult<()> {
        {
            let guard = self.tokens.read().await;
            match guard.as_ref() {
                None => return Err(ApiError::Unauthorized),
                Some(set) if !set.context.expires_within(REFRESH_MARGIN_SECS, now_unix()) => {
                    return Ok(());
                }
                Some(_) => {}
            }
        }

        let mut guard = self.tokens.write().await;
        let set = match guard.as_mut() {
            None => return Err(ApiError::Unauthorized),
            Some(set) => set,
        };
        if !set.context.expires_within(REFRESH_MARGIN_SECS, now_unix()) {
            return Ok(());
        }

        match self.refresh(&set.refresh, &set.context.username).await {
            Ok(context) => {
                set.context = context;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing session");
                *guard = None;
                self.http.set_bearer(None).await;
                Err(ApiError::Unauthorized)
            }
        }
    }

    async fn refresh(&self, refresh: &str, fallback_username: &str) -> ApiResult<SessionContext> {
        let url = self.http.endpoint("api/token/refresh/")?;
        let response: RefreshResponse = self
            .http
            .post_expect(url, &RefreshRequest { refresh }, StatusCode::OK)
            .await?;

        let context = decode_context(&response.access, fallback_username)?;
        self.http.set_bearer(Some(response.access)).await;
        debug!(expires_at = context.expires_at, "access token refreshed");
        Ok(context)
    }

    #[cfg(test)]
    async fn seed(&self, refresh: &str, context: SessionContext) {
        self.http.set_bearer(Some("seeded-access".into())).await;
        *self.tokens.write().await = Some(TokenSet {
            refresh: refresh.to_string(),
            context,
        });
    }
}

/// Decodes the claims of an access token into a [`SessionContext`].
///
/// The client has no signing key, so the signature is not verified, and
/// expiry is handled by [`SessionManager::ensure_fresh`] rather than
/// rejected at decode time.
fn decode_context(access: &str, fallback_username: &str) -> ApiResult<SessionContext> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    let data = jsonwebtoken::decode::<AccessClaims>(access, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| ApiError::decode(format!("access token claims: {e}")))?;

    let claims = data.claims;
    Ok(SessionContext::new(
        claims
            .username
            .unwrap_or_else(|| fallback_username.to_string()),
        claims.groups.unwrap_or_default(),
        claims.exp,
    ))
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    /// Mirror of what the backend actually puts in a token, including the
    /// standard claims the client ignores.
    #[derive(serde::Serialize)]
    struct IssuedClaims {
        token_type: &'static str,
        exp: i64,
        jti: &'static str,
        user_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        groups: Option<Vec<String>>,
    }

    fn issue(username: Option<&str>, groups: Option<Vec<&str>>, exp: i64) -> String {
        let claims = IssuedClaims {
            token_type: "access",
            exp,
            jti: "abc123",
            user_id: 7,
            username: username.map(str::to_string),
            groups: groups.map(|g| g.into_iter().map(str::to_string).collect()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_extracts_username_groups_and_expiry() {
        let token = issue(Some("lan"), Some(vec!["Manager", "Saler"]), 2_000_000_000);
        let context = decode_context(&token, "fallback").unwrap();
        assert_eq!(context.username, "lan");
        assert_eq!(context.groups, vec!["Manager", "Saler"]);
        assert_eq!(context.expires_at, 2_000_000_000);
    }

    #[test]
    fn test_decode_falls_back_to_login_username() {
        let token = issue(None, None, 2_000_000_000);
        let context = decode_context(&token, "typed-at-login").unwrap();
        assert_eq!(context.username, "typed-at-login");
        assert!(context.groups.is_empty());
    }

    #[test]
    fn test_expired_token_still_decodes() {
        // Expiry is enforced by ensure_fresh, not at decode time.
        let token = issue(Some("lan"), None, 1_000);
        let context = decode_context(&token, "x").unwrap();
        assert_eq!(context.expires_at, 1_000);
        assert!(context.is_expired(now_unix()));
    }

    #[test]
    fn test_garbage_token_is_a_decode_error() {
        let err = decode_context("not-a-jwt", "x").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_ensure_fresh_without_session_is_unauthorized() {
        let manager = SessionManager::new(HttpClient::new("http://127.0.0.1:1").unwrap());
        assert!(matches!(
            manager.ensure_fresh().await,
            Err(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_ensure_fresh_with_distant_expiry_is_a_noop() {
        let manager = SessionManager::new(HttpClient::new("http://127.0.0.1:1").unwrap());
        let context = SessionContext::new("lan", vec![], now_unix() + 3_600);
        manager.seed("refresh-token", context).await;
        manager.ensure_fresh().await.unwrap();
        assert!(manager.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_the_session() {
        // Port 1 accepts no connections, so the refresh POST fails at the
        // transport layer.
        let manager = SessionManager::new(HttpClient::new("http://127.0.0.1:1").unwrap());
        let context = SessionContext::new("lan", vec![], now_unix() + 10);
        manager.seed("refresh-token", context).await;

        assert!(matches!(
            manager.ensure_fresh().await,
            Err(ApiError::Unauthorized)
        ));
        assert!(!manager.is_authenticated().await);
        assert_eq!(manager.context().await, None);
    }

    #[tokio::test]
    async fn test_logout_clears_context() {
        let manager = SessionManager::new(HttpClient::new("http://127.0.0.1:1").unwrap());
        let context = SessionContext::new("lan", vec!["Manager".into()], now_unix() + 3_600);
        manager.seed("refresh-token", context).await;
        assert!(manager.is_authenticated().await);

        manager.logout().await;
        assert!(!manager.is_authenticated().await);
        assert_eq!(manager.context().await, None);
    }
}
