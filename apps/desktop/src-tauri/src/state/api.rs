//! # API State
//!
//! Wraps the `ApiClient` for use in Tauri commands.
//!
//! ## Thread Safety
//! The `ApiClient` from `atlas-api` clones a shared `reqwest::Client`
//! into each resource accessor, so multiple commands can talk to the
//! backend concurrently without explicit locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! #[tauri::command]
//! async fn list_customers(
//!     api: State<'_, ApiState>,
//!     query: String,
//! ) -> Result<Vec<CustomerDto>, CommandError> {
//!     let rows = (*api).inner().customers().list(&ListQuery::bulk()).await?;
//!     Ok(rows.into_iter().map(CustomerDto::from).collect())
//! }
//! ```

use atlas_api::ApiClient;

/// Wrapper around `ApiClient` for Tauri state management.
///
/// ## Why a Wrapper?
/// Tauri's state management requires types to implement `Send + Sync`.
/// This wrapper makes the intent explicit and provides a clean API
/// for reaching the backend in commands.
#[derive(Debug)]
pub struct ApiState {
    client: ApiClient,
}

impl ApiState {
    /// Creates a new ApiState wrapping the REST client.
    pub fn new(client: ApiClient) -> Self {
        ApiState { client }
    }

    /// Returns a reference to the inner ApiClient.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let rows = api_state.inner().products().list(&query).await?;
    /// ```
    pub fn inner(&self) -> &ApiClient {
        &self.client
    }
}
