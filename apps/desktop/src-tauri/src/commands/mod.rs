//! # Tauri Commands Module
//!
//! All commands exposed to the frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── auth.rs       ◄─── Login, session, role guards
//! ├── catalog.rs    ◄─── Products, variants, categories, attributes, units
//! ├── partners.rs   ◄─── Customers and suppliers
//! ├── promotions.rs ◄─── Discounts, conditions, coupons
//! ├── orders.rs     ◄─── Sale editing, submission, payment, invoices
//! ├── purchases.rs  ◄─── Purchase drafting, receiving, cancelling
//! └── dashboard.rs  ◄─── Revenue chart, expiry warnings, stock ledger
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tauri Command Flow                                   │
//! │                                                                         │
//! │  Frontend                                                               │
//! │  ────────                                                               │
//! │  import { invoke } from '@tauri-apps/api/core';                         │
//! │                                                                         │
//! │  const draft = await invoke('select_order_variant', {                   │
//! │    key: lineKey,                                                        │
//! │    variantId: 17                                                        │
//! │  });                                                                    │
//! │         │                                                               │
//! │         │ (IPC via WebView)                                             │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  #[tauri::command]                                                      │
//! │  async fn select_order_variant(                                         │
//! │      api: State<'_, ApiState>,            ◄── Injected by Tauri        │
//! │      references: State<'_, ReferenceState>,                             │
//! │      order_editor: State<'_, OrderEditorState>,                         │
//! │      key: Uuid,                           ◄── From invoke params       │
//! │      variant_id: i64,                                                   │
//! │  ) -> Result<OrderDraftDto, CommandError>                               │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Frontend receives the whole draft, re-rendered in one pass             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the backend client
//! async fn list_customers(api: State<'_, ApiState>, ...)
//!
//! // Only needs the draft
//! fn get_order_draft(order_editor: State<'_, OrderEditorState>)
//!
//! // Needs client, caches and draft together
//! async fn select_order_variant(
//!     api: State<'_, ApiState>,
//!     references: State<'_, ReferenceState>,
//!     order_editor: State<'_, OrderEditorState>,
//!     ...
//! )
//! ```

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod orders;
pub mod partners;
pub mod promotions;
pub mod purchases;
