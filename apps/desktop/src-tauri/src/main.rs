//! # Atlas Desktop Application Entry Point
//!
//! This is the main entry point for the Tauri desktop application.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Atlas Back Office Desktop                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Tauri WebView                               │  │
//! │  │  ┌────────────────────────────────────────────────────────────┐  │  │
//! │  │  │                    React Frontend                          │  │  │
//! │  │  │  • Catalog & Partners   • Order / Purchase Editors         │  │  │
//! │  │  │  • Promotions           • Revenue Dashboard                │  │  │
//! │  │  └────────────────────────────────────────────────────────────┘  │  │
//! │  │                              │                                   │  │
//! │  │                     invoke('command')                           │  │
//! │  │                              │                                   │  │
//! │  └──────────────────────────────┼───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Sets up logging, config, state                   │  │
//! │  │                                                                  │  │
//! │  │  lib.rs ─────► Configures Tauri plugins and commands            │  │
//! │  │                                                                  │  │
//! │  │  commands/ ──► search_sale_variants, submit_order, login        │  │
//! │  │                                                                  │  │
//! │  │  state/ ─────► ApiState, ReferenceState, editor drafts          │  │
//! │  │                                                                  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Store Backend (REST)                        │  │
//! │  │  /api/products/, /api/orders/, /api/discounts/, /api/login/ ...  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load the app config (backend URL) from the config directory
//! 3. Build the shared REST client
//! 4. Create state objects (ApiState, ReferenceState, editor states)
//! 5. Build Tauri application
//! 6. Register commands
//! 7. Launch window

// Prevents an additional console window on Windows in release
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

fn main() {
    // Run the Tauri application
    // The actual setup is in lib.rs for better testability
    atlas_desktop_lib::run();
}
