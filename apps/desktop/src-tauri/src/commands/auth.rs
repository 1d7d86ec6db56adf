//! # Auth Commands
//!
//! Login, session inspection, and sign-out.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Flow                                         │
//! │                                                                         │
//! │  invoke('login', { username, password })                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST /api/token/ ──► { access, refresh }                               │
//! │       │                                                                 │
//! │       ▼ claims decoded once                                             │
//! │  SessionContext { username, groups, expires_at }                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Every later command calls require_session():                           │
//! │    • refreshes the access token when it is about to expire              │
//! │    • returns Unauthorized when nobody is signed in                      │
//! │                                                                         │
//! │  invoke('logout') drops the tokens locally; no backend call is made    │
//! │  and the reference caches and editor drafts are cleared.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{debug, info};

use crate::error::CommandError;
use crate::state::{ApiState, OrderEditorState, PurchaseEditorState, ReferenceState};
use atlas_api::ApiClient;
use atlas_core::session::SessionContext;

/// Signed-in employee view for the frontend, with the role checks
/// already evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub username: String,
    pub groups: Vec<String>,
    pub expires_at: i64,
    pub can_manage_store: bool,
    pub can_view_purchases: bool,
    pub can_create_purchases: bool,
}

impl From<&SessionContext> for SessionDto {
    fn from(ctx: &SessionContext) -> Self {
        SessionDto {
            username: ctx.username.clone(),
            groups: ctx.groups.clone(),
            expires_at: ctx.expires_at,
            can_manage_store: ctx.can_manage_store(),
            can_view_purchases: ctx.can_view_purchases(),
            can_create_purchases: ctx.can_create_purchases(),
        }
    }
}

// =============================================================================
// Guards
// =============================================================================

/// Returns the live session, refreshing the access token first when it
/// is close to expiry.
pub(crate) async fn require_session(api: &ApiClient) -> Result<SessionContext, CommandError> {
    api.session().ensure_fresh().await?;
    api.session()
        .context()
        .await
        .ok_or_else(CommandError::unauthorized)
}

/// Store screens: catalog, partners, promotions, orders, dashboard.
pub(crate) async fn require_store_role(api: &ApiClient) -> Result<SessionContext, CommandError> {
    let ctx = require_session(api).await?;
    if !ctx.can_manage_store() {
        return Err(CommandError::forbidden("manage the store"));
    }
    Ok(ctx)
}

/// Purchasing screens: owners and warehouse staff.
pub(crate) async fn require_purchase_view(api: &ApiClient) -> Result<SessionContext, CommandError> {
    let ctx = require_session(api).await?;
    if !ctx.can_view_purchases() {
        return Err(CommandError::forbidden("view purchase orders"));
    }
    Ok(ctx)
}

/// Opening a new purchase order is owner-only.
pub(crate) async fn require_purchase_create(
    api: &ApiClient,
) -> Result<SessionContext, CommandError> {
    let ctx = require_session(api).await?;
    if !ctx.can_create_purchases() {
        return Err(CommandError::forbidden("create purchase orders"));
    }
    Ok(ctx)
}

// =============================================================================
// Commands
// =============================================================================

/// Signs in against the backend token endpoint.
///
/// ## Returns
/// The decoded session with role flags, ready for routing decisions.
#[tauri::command]
pub async fn login(
    api: State<'_, ApiState>,
    username: String,
    password: String,
) -> Result<SessionDto, CommandError> {
    debug!(username = %username, "login command");

    let ctx = (*api).inner().session().login(&username, &password).await?;

    info!(username = %ctx.username, groups = ?ctx.groups, "Signed in");
    Ok(SessionDto::from(&ctx))
}

/// Returns the current session, or `None` when nobody is signed in.
///
/// ## When To Use
/// - App start, to decide between login screen and main layout
/// - Header display of the signed-in user
#[tauri::command]
pub async fn current_session(api: State<'_, ApiState>) -> Result<Option<SessionDto>, CommandError> {
    debug!("current_session command");
    let ctx = (*api).inner().session().context().await;
    Ok(ctx.map(|ctx| SessionDto::from(&ctx)))
}

/// Signs out locally. Tokens are dropped, caches and drafts cleared;
/// the backend is not called.
#[tauri::command]
pub async fn logout(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
    order_editor: State<'_, OrderEditorState>,
    purchase_editor: State<'_, PurchaseEditorState>,
) -> Result<(), CommandError> {
    debug!("logout command");

    (*api).inner().session().logout().await;
    references.with_caches_mut(|caches| caches.clear());
    order_editor.with_draft_mut(|draft| draft.reset());
    purchase_editor.with_draft_mut(|draft| draft.reset());

    info!("Signed out");
    Ok(())
}
