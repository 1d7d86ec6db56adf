//! # Atlas Desktop Library
//!
//! Core library for the Atlas Back Office desktop application.
//! This is the main entry point that configures and runs the Tauri app.
//!
//! ## Module Organization
//! ```text
//! atlas_desktop_lib/
//! ├── lib.rs                  ◄─── You are here (Tauri setup & run)
//! ├── config.rs               ◄─── Backend URL from env/TOML/defaults
//! ├── state/
//! │   ├── mod.rs              ◄─── State type exports
//! │   ├── api.rs              ◄─── REST client wrapper
//! │   ├── reference.rs        ◄─── Picker caches (customers, variants, ...)
//! │   ├── order_editor.rs     ◄─── Sale draft state machine
//! │   └── purchase_editor.rs  ◄─── Purchase draft state machine
//! ├── commands/
//! │   ├── mod.rs              ◄─── Command exports
//! │   ├── auth.rs             ◄─── Login, session, role guards
//! │   ├── catalog.rs          ◄─── Products, categories, attributes, units
//! │   ├── partners.rs         ◄─── Customers and suppliers
//! │   ├── promotions.rs       ◄─── Discounts, conditions, coupons
//! │   ├── orders.rs           ◄─── Sale editing, submission, payment
//! │   ├── purchases.rs        ◄─── Purchase drafting and receiving
//! │   └── dashboard.rs        ◄─── Revenue, expiry warnings, stock
//! └── error.rs                ◄─── Command error type
//! ```
//!
//! ## State Management (Multiple Focused State Types)
//! Instead of a single `AppState` struct, we use multiple focused state types:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tauri State Management                               │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐  │
//! │  │  ApiState    │ │ Reference    │ │ OrderEditor  │ │ Purchase     │  │
//! │  │              │ │ State        │ │ State        │ │ EditorState  │  │
//! │  │ • REST       │ │ • customers  │ │ • sale draft │ │ • purchase   │  │
//! │  │   client     │ │ • suppliers  │ │ • lines      │ │   draft      │  │
//! │  │ • session    │ │ • variants   │ │ • lookup     │ │ • transition │  │
//! │  │   tokens     │ │ • units      │ │   tokens     │ │   guard      │  │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘  │
//! │                                                                         │
//! │  WHY: Each command only requests the state it needs.                   │
//! │       Better separation of concerns and testability.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tauri::Manager;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use atlas_api::ApiClient;
use config::AppConfig;
use state::{ApiState, OrderEditorState, PurchaseEditorState, ReferenceState};

/// Runs the Tauri application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • ATLAS_API_URL env var, else config.toml, else 127.0.0.1:8000      │
/// │     • The default file is written on first run                          │
/// │                                                                         │
/// │  3. Build the REST Client ────────────────────────────────────────────► │
/// │     • One reqwest client shared by every command                        │
/// │     • Session tokens live behind it                                     │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • ApiState, ReferenceState, OrderEditorState, PurchaseEditorState   │
/// │                                                                         │
/// │  5. Build & Run Tauri App ────────────────────────────────────────────► │
/// │     • Register all commands                                             │
/// │     • Manage state                                                      │
/// │     • Launch window                                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() {
    // Initialize tracing (logging)
    init_tracing();

    info!("Starting Atlas Back Office");

    // Build and run the Tauri app
    tauri::Builder::default()
        // Setup hook runs before the app starts
        .setup(|app| {
            let config = load_config();
            info!(backend = %config.backend_url(), "Configuration loaded");

            // One shared REST client; commands clone accessors off it
            let client = ApiClient::new(config.backend_url())?;

            app.manage(ApiState::new(client));
            app.manage(ReferenceState::new());
            app.manage(OrderEditorState::new());
            app.manage(PurchaseEditorState::new());

            info!("State initialized");
            Ok(())
        })
        // Register all commands
        .invoke_handler(tauri::generate_handler![
            // Session commands
            commands::auth::login,
            commands::auth::current_session,
            commands::auth::logout,
            // Catalog commands
            commands::catalog::list_products,
            commands::catalog::get_product,
            commands::catalog::create_product,
            commands::catalog::update_product,
            commands::catalog::delete_product,
            commands::catalog::list_variants,
            commands::catalog::update_variant,
            commands::catalog::delete_variant,
            commands::catalog::list_categories,
            commands::catalog::create_category,
            commands::catalog::update_category,
            commands::catalog::delete_category,
            commands::catalog::list_attributes,
            commands::catalog::create_attribute,
            commands::catalog::update_attribute,
            commands::catalog::delete_attribute,
            commands::catalog::list_units,
            commands::catalog::create_unit,
            commands::catalog::update_unit,
            commands::catalog::delete_unit,
            // Partner commands
            commands::partners::list_customers,
            commands::partners::get_customer,
            commands::partners::create_customer,
            commands::partners::update_customer,
            commands::partners::list_suppliers,
            commands::partners::get_supplier,
            commands::partners::create_supplier,
            commands::partners::update_supplier,
            commands::partners::delete_supplier,
            // Promotion commands
            commands::promotions::list_discounts,
            commands::promotions::get_discount,
            commands::promotions::create_discount,
            commands::promotions::update_discount,
            commands::promotions::sync_discount_conditions,
            commands::promotions::delete_discount,
            commands::promotions::list_coupons,
            commands::promotions::get_coupon,
            commands::promotions::create_coupon,
            commands::promotions::update_coupon,
            commands::promotions::delete_coupon,
            // Sale commands
            commands::orders::load_sale_references,
            commands::orders::search_sale_variants,
            commands::orders::search_order_customers,
            commands::orders::start_order,
            commands::orders::get_order_draft,
            commands::orders::add_order_line,
            commands::orders::remove_order_line,
            commands::orders::update_order_quantity,
            commands::orders::set_order_line_unit,
            commands::orders::apply_line_discount,
            commands::orders::set_order_customer,
            commands::orders::set_order_coupon,
            commands::orders::set_order_discount,
            commands::orders::set_order_payment_method,
            commands::orders::select_order_variant,
            commands::orders::submit_order,
            commands::orders::order_payment_preview,
            commands::orders::quick_cash_options,
            commands::orders::mark_order_paid,
            commands::orders::cancel_order,
            commands::orders::load_order_for_edit,
            commands::orders::list_orders,
            commands::orders::get_order,
            commands::orders::list_invoices,
            commands::orders::get_invoice,
            // Purchase commands
            commands::purchases::load_purchase_references,
            commands::purchases::search_purchase_suppliers,
            commands::purchases::search_purchase_variants,
            commands::purchases::start_purchase,
            commands::purchases::get_purchase_draft,
            commands::purchases::add_purchase_line,
            commands::purchases::remove_purchase_line,
            commands::purchases::update_purchase_quantity,
            commands::purchases::set_purchase_cost,
            commands::purchases::set_purchase_unit,
            commands::purchases::set_purchase_expiry,
            commands::purchases::set_purchase_supplier,
            commands::purchases::select_purchase_variant,
            commands::purchases::submit_purchase,
            commands::purchases::receive_purchase,
            commands::purchases::cancel_purchase,
            commands::purchases::list_purchases,
            commands::purchases::get_purchase,
            commands::purchases::load_purchase_for_edit,
            // Dashboard commands
            commands::dashboard::revenue_statistics,
            commands::dashboard::expiry_warnings,
            commands::dashboard::variant_stock_ledger,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=atlas=trace` - Show trace for atlas crates only
/// - Default: INFO level
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,atlas=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

/// Loads the app config, writing the default file on first run so the
/// backend URL has an obvious place to be edited.
fn load_config() -> AppConfig {
    let config = AppConfig::load_or_default(None);
    if let Some(path) = AppConfig::default_config_path() {
        if !path.exists() {
            if let Err(err) = config.save(None) {
                warn!(error = %err, "Could not write the default config file");
            }
        }
    }
    config
}
