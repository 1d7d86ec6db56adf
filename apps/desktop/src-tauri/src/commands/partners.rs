//! # Partner Commands
//!
//! Customers and suppliers. Customers attach to sales orders and keep
//! their purchase history server-side; suppliers anchor purchase orders.
//! Customer rows are never deleted, only edited.

use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{debug, info};

use crate::commands::auth::require_store_role;
use crate::error::CommandError;
use crate::state::ApiState;
use atlas_core::validation::{validate_name, validate_phone};

use atlas_api::{
    CustomerFilter, CustomerPayload, CustomerRow, ListQuery, SupplierFilter, SupplierPayload,
    SupplierRow,
};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
    pub tier: Option<i64>,
}

impl From<CustomerRow> for CustomerDto {
    fn from(row: CustomerRow) -> Self {
        CustomerDto {
            id: row.id,
            name: row.cus_name,
            phone: row.cus_phone,
            email: row.cus_mail,
            address: row.cus_address,
            created_at: row.create_at,
            tier: row.tier,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDto {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl From<SupplierRow> for SupplierDto {
    fn from(row: SupplierRow) -> Self {
        SupplierDto {
            id: row.id,
            name: row.sup_name,
            contact_person: row.contact_person,
            phone: row.sup_phone,
            email: row.sup_mail,
            address: row.sup_add,
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tier: Option<i64>,
}

impl CustomerInput {
    fn into_payload(self) -> Result<CustomerPayload, CommandError> {
        validate_name("customer name", &self.name)?;
        validate_phone(&self.phone)?;
        Ok(CustomerPayload {
            cus_name: self.name.trim().to_string(),
            cus_phone: self.phone.trim().to_string(),
            cus_mail: self.email,
            cus_address: self.address,
            tier: self.tier,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInput {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl SupplierInput {
    fn into_payload(self) -> Result<SupplierPayload, CommandError> {
        validate_name("supplier name", &self.name)?;
        validate_phone(&self.phone)?;
        Ok(SupplierPayload {
            sup_name: self.name.trim().to_string(),
            contact_person: self.contact_person,
            sup_phone: self.phone.trim().to_string(),
            sup_mail: self.email,
            sup_add: self.address,
        })
    }
}

// =============================================================================
// Customers
// =============================================================================

/// Lists customers, optionally filtered by name.
#[tauri::command]
pub async fn list_customers(
    api: State<'_, ApiState>,
    search: Option<String>,
) -> Result<Vec<CustomerDto>, CommandError> {
    debug!(search = ?search, "list_customers command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let query = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => ListQuery::search(CustomerFilter::Name(term.to_string())),
        _ => ListQuery::bulk(),
    };
    let rows = client.customers().list(&query).await?;
    Ok(rows.into_iter().map(CustomerDto::from).collect())
}

/// Fetches one customer.
#[tauri::command]
pub async fn get_customer(api: State<'_, ApiState>, id: i64) -> Result<CustomerDto, CommandError> {
    debug!(id = %id, "get_customer command");
    let client = (*api).inner();
    require_store_role(client).await?;
    Ok(CustomerDto::from(client.customers().retrieve(id).await?))
}

/// Creates a customer.
#[tauri::command]
pub async fn create_customer(
    api: State<'_, ApiState>,
    input: CustomerInput,
) -> Result<CustomerDto, CommandError> {
    debug!(name = %input.name, "create_customer command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.customers().create(&input.into_payload()?).await?;
    info!(id = %row.id, "Customer created");
    Ok(CustomerDto::from(row))
}

/// Updates a customer.
#[tauri::command]
pub async fn update_customer(
    api: State<'_, ApiState>,
    id: i64,
    input: CustomerInput,
) -> Result<CustomerDto, CommandError> {
    debug!(id = %id, "update_customer command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.customers().update(id, &input.into_payload()?).await?;
    info!(id = %id, "Customer updated");
    Ok(CustomerDto::from(row))
}

// =============================================================================
// Suppliers
// =============================================================================

/// Lists suppliers, optionally filtered by name.
#[tauri::command]
pub async fn list_suppliers(
    api: State<'_, ApiState>,
    search: Option<String>,
) -> Result<Vec<SupplierDto>, CommandError> {
    debug!(search = ?search, "list_suppliers command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let query = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => ListQuery::search(SupplierFilter::Name(term.to_string())),
        _ => ListQuery::bulk(),
    };
    let rows = client.suppliers().list(&query).await?;
    Ok(rows.into_iter().map(SupplierDto::from).collect())
}

/// Fetches one supplier.
#[tauri::command]
pub async fn get_supplier(api: State<'_, ApiState>, id: i64) -> Result<SupplierDto, CommandError> {
    debug!(id = %id, "get_supplier command");
    let client = (*api).inner();
    require_store_role(client).await?;
    Ok(SupplierDto::from(client.suppliers().retrieve(id).await?))
}

/// Creates a supplier.
#[tauri::command]
pub async fn create_supplier(
    api: State<'_, ApiState>,
    input: SupplierInput,
) -> Result<SupplierDto, CommandError> {
    debug!(name = %input.name, "create_supplier command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.suppliers().create(&input.into_payload()?).await?;
    info!(id = %row.id, "Supplier created");
    Ok(SupplierDto::from(row))
}

/// Updates a supplier.
#[tauri::command]
pub async fn update_supplier(
    api: State<'_, ApiState>,
    id: i64,
    input: SupplierInput,
) -> Result<SupplierDto, CommandError> {
    debug!(id = %id, "update_supplier command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.suppliers().update(id, &input.into_payload()?).await?;
    info!(id = %id, "Supplier updated");
    Ok(SupplierDto::from(row))
}

/// Deletes a supplier.
#[tauri::command]
pub async fn delete_supplier(api: State<'_, ApiState>, id: i64) -> Result<(), CommandError> {
    debug!(id = %id, "delete_supplier command");
    let client = (*api).inner();
    require_store_role(client).await?;

    client.suppliers().delete(id).await?;
    info!(id = %id, "Supplier deleted");
    Ok(())
}
