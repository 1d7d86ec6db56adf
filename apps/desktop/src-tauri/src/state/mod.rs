//! # State Module
//!
//! Manages application state for the Tauri desktop app.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct containing everything,
//! we use separate state types. This approach:
//!
//! 1. **Better Separation of Concerns**: Each state type has a single responsibility
//! 2. **Easier Testing**: Can mock/inject individual states
//! 3. **Clearer Command Signatures**: Commands declare exactly what state they need
//! 4. **Reduced Contention**: Independent states don't block each other
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Tauri Runtime                              │   │
//! │  │  app.manage(api_state);                                         │   │
//! │  │  app.manage(reference_state);                                   │   │
//! │  │  app.manage(order_editor);                                      │   │
//! │  │  app.manage(purchase_editor);                                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │      ┌───────────────┬──────┴────────┬─────────────────┐               │
//! │      ▼               ▼               ▼                 ▼               │
//! │  ┌──────────┐  ┌────────────┐  ┌────────────┐  ┌───────────────┐      │
//! │  │ ApiState │  │ Reference  │  │ OrderEditor│  │ PurchaseEditor│      │
//! │  │          │  │ State      │  │ State      │  │ State         │      │
//! │  │ REST     │  │            │  │            │  │               │      │
//! │  │ client + │  │ Arc<Mutex< │  │ Arc<Mutex< │  │ Arc<Mutex<    │      │
//! │  │ session  │  │  caches >> │  │  draft  >> │  │  draft >>     │      │
//! │  └──────────┘  └────────────┘  └────────────┘  └───────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ApiState: HTTP client clones cheaply; session behind its own lock   │
//! │  • ReferenceState: Protected by Arc<Mutex<T>> for exclusive access     │
//! │  • Editor states: Protected by Arc<Mutex<T>> for exclusive access      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod api;
mod order_editor;
mod purchase_editor;
mod reference;

pub use api::ApiState;
pub use order_editor::{OrderDraft, OrderEditorState, OrderLine};
pub use purchase_editor::{PurchaseDraft, PurchaseEditorState, PurchaseLine};
pub use reference::{RefCache, RefRow, ReferenceCaches, ReferenceState};
