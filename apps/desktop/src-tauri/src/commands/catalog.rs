//! # Catalog Commands
//!
//! Products, variants, categories, attributes, and units.
//!
//! ## Catalog Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Shape                                        │
//! │                                                                         │
//! │  Category ──┐                                                           │
//! │             ├──► Product ──► attributes (size, sugar, ...)              │
//! │  Unit ──────┘        │                                                  │
//! │                      ▼ (backend expands attribute combinations)         │
//! │                   Variant  ◄── the sellable row: sku, price, cost       │
//! │                                                                         │
//! │  Orders and purchases always reference VARIANTS, never products.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All writes require the store role. List commands take an optional
//! search term; without one they page through the full catalog.

use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{debug, info};

use crate::commands::auth::require_store_role;
use crate::error::CommandError;
use crate::state::ApiState;
use atlas_core::validation::validate_name;

use atlas_api::{
    AttributeDisplay, AttributeFilter, AttributePayload, AttributeRow, AttributeSelection,
    AttributeValueInput, CategoryFilter, CategoryPayload, CategoryRow, ListQuery, ProductFilter,
    ProductPayload, ProductRow, ProductType, UnitFilter, UnitPayload, UnitRow, VariantFilter,
    VariantPayload, VariantRow,
};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributeDto {
    pub value: String,
    pub extra_price: i64,
}

/// Product list/detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub product_type: ProductType,
    pub barcode: Option<String>,
    pub price: i64,
    pub cost_price: i64,
    pub taxes: i64,
    pub category_id: i64,
    pub unit_id: i64,
    pub image: Option<String>,
    pub total_inventory: i64,
    pub attributes: Vec<ProductAttributeDto>,
}

impl From<ProductRow> for ProductDto {
    fn from(row: ProductRow) -> Self {
        ProductDto {
            id: row.id,
            name: row.prod_name,
            product_type: row.prod_type,
            barcode: row.barcode,
            price: row.prod_price,
            cost_price: row.prod_cost_price,
            taxes: row.taxes,
            category_id: row.category,
            unit_id: row.unit,
            image: row.image,
            total_inventory: row.total_inventory,
            attributes: row
                .attributes_display
                .into_iter()
                .map(|a| ProductAttributeDto {
                    value: a.value,
                    extra_price: a.default_extra_price,
                })
                .collect(),
        }
    }
}

/// Variant list view. `name` falls back to the sku for variants the
/// backend generated without a display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDto {
    pub id: i64,
    pub sku: Option<String>,
    pub name: String,
    pub price: i64,
    pub cost_price: i64,
    pub product_name: Option<String>,
    pub image: Option<String>,
}

impl From<VariantRow> for VariantDto {
    fn from(row: VariantRow) -> Self {
        let name = row
            .variant_name
            .or_else(|| row.sku.clone())
            .unwrap_or_else(|| format!("#{}", row.id));
        VariantDto {
            id: row.id,
            sku: row.sku,
            name,
            price: row.variant_price,
            cost_price: row.variant_cost_price,
            product_name: row.product_name,
            image: row.image,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub parent_name: Option<String>,
}

impl From<CategoryRow> for CategoryDto {
    fn from(row: CategoryRow) -> Self {
        CategoryDto {
            id: row.id,
            name: row.cate_name,
            description: row.cate_desc,
            parent_id: row.parent,
            parent_name: row.parent_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValueDto {
    pub id: i64,
    pub value: String,
    pub extra_price: i64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDto {
    pub id: i64,
    pub name: String,
    pub display_type: AttributeDisplay,
    pub values: Vec<AttributeValueDto>,
}

impl From<AttributeRow> for AttributeDto {
    fn from(row: AttributeRow) -> Self {
        AttributeDto {
            id: row.id,
            name: row.att_name,
            display_type: row.display_type,
            values: row
                .values
                .into_iter()
                .map(|v| AttributeValueDto {
                    id: v.id,
                    value: v.value,
                    extra_price: v.default_extra_price.unwrap_or(0),
                    color: v.color,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDto {
    pub id: i64,
    pub name: String,
    pub contains: Option<f64>,
    pub reference_unit_id: Option<i64>,
    pub reference_unit_name: Option<String>,
}

impl From<UnitRow> for UnitDto {
    fn from(row: UnitRow) -> Self {
        UnitDto {
            id: row.id,
            name: row.unit_name,
            contains: row.contains,
            reference_unit_id: row.reference_unit,
            reference_unit_name: row.reference_unit_name,
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSelectionInput {
    pub value: String,
    pub extra_price: i64,
    pub attribute_id: i64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub product_type: ProductType,
    pub barcode: Option<String>,
    pub price: i64,
    pub cost_price: i64,
    pub taxes: i64,
    pub category_id: i64,
    pub unit_id: i64,
    #[serde(default)]
    pub attributes: Vec<AttributeSelectionInput>,
}

impl ProductInput {
    fn into_payload(self) -> Result<ProductPayload, CommandError> {
        validate_name("product name", &self.name)?;
        Ok(ProductPayload {
            prod_name: self.name.trim().to_string(),
            prod_type: self.product_type,
            barcode: self.barcode,
            prod_price: self.price,
            prod_cost_price: self.cost_price,
            taxes: self.taxes,
            category: self.category_id,
            unit: self.unit_id,
            attributes: self
                .attributes
                .into_iter()
                .map(|a| AttributeSelection {
                    value: a.value,
                    default_extra_price: a.extra_price,
                    attribute_id: a.attribute_id,
                    color: a.color,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub name: String,
    pub sku: Option<String>,
    pub price: i64,
    pub cost_price: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValueEntry {
    pub value: String,
    pub extra_price: i64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInput {
    pub name: String,
    pub display_type: AttributeDisplay,
    pub values: Vec<AttributeValueEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInput {
    pub name: String,
    pub contains: Option<f64>,
    pub reference_unit_id: Option<i64>,
}

// =============================================================================
// Products
// =============================================================================

/// Lists products, optionally filtered by name.
#[tauri::command]
pub async fn list_products(
    api: State<'_, ApiState>,
    search: Option<String>,
) -> Result<Vec<ProductDto>, CommandError> {
    debug!(search = ?search, "list_products command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let query = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => ListQuery::search(ProductFilter::Name(term.to_string())),
        _ => ListQuery::bulk(),
    };
    let rows = client.products().list(&query).await?;
    Ok(rows.into_iter().map(ProductDto::from).collect())
}

/// Fetches one product with its attribute display rows.
#[tauri::command]
pub async fn get_product(api: State<'_, ApiState>, id: i64) -> Result<ProductDto, CommandError> {
    debug!(id = %id, "get_product command");
    let client = (*api).inner();
    require_store_role(client).await?;
    Ok(ProductDto::from(client.products().retrieve(id).await?))
}

/// Creates a product. The backend expands the submitted attribute
/// selections into variants.
#[tauri::command]
pub async fn create_product(
    api: State<'_, ApiState>,
    input: ProductInput,
) -> Result<ProductDto, CommandError> {
    debug!(name = %input.name, "create_product command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.products().create(&input.into_payload()?).await?;
    info!(id = %row.id, "Product created");
    Ok(ProductDto::from(row))
}

/// Updates a product's base fields and attribute selections.
#[tauri::command]
pub async fn update_product(
    api: State<'_, ApiState>,
    id: i64,
    input: ProductInput,
) -> Result<ProductDto, CommandError> {
    debug!(id = %id, "update_product command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.products().update(id, &input.into_payload()?).await?;
    info!(id = %id, "Product updated");
    Ok(ProductDto::from(row))
}

/// Deletes a product and its variants.
#[tauri::command]
pub async fn delete_product(api: State<'_, ApiState>, id: i64) -> Result<(), CommandError> {
    debug!(id = %id, "delete_product command");
    let client = (*api).inner();
    require_store_role(client).await?;

    client.products().delete(id).await?;
    info!(id = %id, "Product deleted");
    Ok(())
}

// =============================================================================
// Variants
// =============================================================================

/// Lists variants, optionally filtered by name.
#[tauri::command]
pub async fn list_variants(
    api: State<'_, ApiState>,
    search: Option<String>,
) -> Result<Vec<VariantDto>, CommandError> {
    debug!(search = ?search, "list_variants command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let query = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => ListQuery::search(VariantFilter::Name(term.to_string())),
        _ => ListQuery::bulk(),
    };
    let rows = client.products().list_variants(&query).await?;
    Ok(rows.into_iter().map(VariantDto::from).collect())
}

/// Updates a variant's name, sku, and prices.
#[tauri::command]
pub async fn update_variant(
    api: State<'_, ApiState>,
    id: i64,
    input: VariantInput,
) -> Result<VariantDto, CommandError> {
    debug!(id = %id, "update_variant command");
    let client = (*api).inner();
    require_store_role(client).await?;

    validate_name("variant name", &input.name)?;
    let payload = VariantPayload {
        variant_name: input.name.trim().to_string(),
        sku: input.sku,
        variant_price: input.price,
        variant_cost_price: input.cost_price,
    };

    let row = client.products().update_variant(id, &payload).await?;
    info!(id = %id, "Variant updated");
    Ok(VariantDto::from(row))
}

/// Deletes a variant.
#[tauri::command]
pub async fn delete_variant(api: State<'_, ApiState>, id: i64) -> Result<(), CommandError> {
    debug!(id = %id, "delete_variant command");
    let client = (*api).inner();
    require_store_role(client).await?;

    client.products().delete_variant(id).await?;
    info!(id = %id, "Variant deleted");
    Ok(())
}

// =============================================================================
// Categories
// =============================================================================

/// Lists categories, optionally filtered by name.
#[tauri::command]
pub async fn list_categories(
    api: State<'_, ApiState>,
    search: Option<String>,
) -> Result<Vec<CategoryDto>, CommandError> {
    debug!(search = ?search, "list_categories command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let query = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => ListQuery::search(CategoryFilter::Name(term.to_string())),
        _ => ListQuery::bulk(),
    };
    let rows = client.categories().list(&query).await?;
    Ok(rows.into_iter().map(CategoryDto::from).collect())
}

/// Creates a category, optionally under a parent.
#[tauri::command]
pub async fn create_category(
    api: State<'_, ApiState>,
    input: CategoryInput,
) -> Result<CategoryDto, CommandError> {
    debug!(name = %input.name, "create_category command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let payload = category_payload(input)?;
    let row = client.categories().create(&payload).await?;
    info!(id = %row.id, "Category created");
    Ok(CategoryDto::from(row))
}

/// Updates a category.
#[tauri::command]
pub async fn update_category(
    api: State<'_, ApiState>,
    id: i64,
    input: CategoryInput,
) -> Result<CategoryDto, CommandError> {
    debug!(id = %id, "update_category command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let payload = category_payload(input)?;
    let row = client.categories().update(id, &payload).await?;
    info!(id = %id, "Category updated");
    Ok(CategoryDto::from(row))
}

/// Deletes a category.
#[tauri::command]
pub async fn delete_category(api: State<'_, ApiState>, id: i64) -> Result<(), CommandError> {
    debug!(id = %id, "delete_category command");
    let client = (*api).inner();
    require_store_role(client).await?;

    client.categories().delete(id).await?;
    info!(id = %id, "Category deleted");
    Ok(())
}

fn category_payload(input: CategoryInput) -> Result<CategoryPayload, CommandError> {
    validate_name("category name", &input.name)?;
    Ok(CategoryPayload {
        cate_name: input.name.trim().to_string(),
        cate_desc: input.description,
        parent: input.parent_id,
    })
}

// =============================================================================
// Attributes
// =============================================================================

/// Lists attributes with their nested values.
#[tauri::command]
pub async fn list_attributes(
    api: State<'_, ApiState>,
    search: Option<String>,
) -> Result<Vec<AttributeDto>, CommandError> {
    debug!(search = ?search, "list_attributes command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let query = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => {
            ListQuery::search(AttributeFilter::Name(term.to_string()))
        }
        _ => ListQuery::bulk(),
    };
    let rows = client.attributes().list(&query).await?;
    Ok(rows.into_iter().map(AttributeDto::from).collect())
}

/// Creates an attribute with its value list.
#[tauri::command]
pub async fn create_attribute(
    api: State<'_, ApiState>,
    input: AttributeInput,
) -> Result<AttributeDto, CommandError> {
    debug!(name = %input.name, "create_attribute command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let payload = attribute_payload(input)?;
    let row = client.attributes().create(&payload).await?;
    info!(id = %row.id, "Attribute created");
    Ok(AttributeDto::from(row))
}

/// Updates an attribute. The submitted value list is the complete
/// desired set; values absent from it are deleted server-side.
#[tauri::command]
pub async fn update_attribute(
    api: State<'_, ApiState>,
    id: i64,
    input: AttributeInput,
) -> Result<AttributeDto, CommandError> {
    debug!(id = %id, "update_attribute command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let payload = attribute_payload(input)?;
    let row = client.attributes().update(id, &payload).await?;
    info!(id = %id, "Attribute updated");
    Ok(AttributeDto::from(row))
}

/// Deletes an attribute and its values.
#[tauri::command]
pub async fn delete_attribute(api: State<'_, ApiState>, id: i64) -> Result<(), CommandError> {
    debug!(id = %id, "delete_attribute command");
    let client = (*api).inner();
    require_store_role(client).await?;

    client.attributes().delete(id).await?;
    info!(id = %id, "Attribute deleted");
    Ok(())
}

fn attribute_payload(input: AttributeInput) -> Result<AttributePayload, CommandError> {
    validate_name("attribute name", &input.name)?;
    if input.values.is_empty() {
        return Err(CommandError::validation(
            "An attribute needs at least one value",
        ));
    }
    Ok(AttributePayload {
        att_name: input.name.trim().to_string(),
        display_type: input.display_type,
        values: input
            .values
            .into_iter()
            .map(|v| AttributeValueInput {
                value: v.value,
                default_extra_price: v.extra_price,
                color: v.color,
            })
            .collect(),
    })
}

// =============================================================================
// Units
// =============================================================================

/// Lists measurement units.
#[tauri::command]
pub async fn list_units(
    api: State<'_, ApiState>,
    search: Option<String>,
) -> Result<Vec<UnitDto>, CommandError> {
    debug!(search = ?search, "list_units command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let query = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => ListQuery::search(UnitFilter::Name(term.to_string())),
        _ => ListQuery::bulk(),
    };
    let rows = client.units().list(&query).await?;
    Ok(rows.into_iter().map(UnitDto::from).collect())
}

/// Creates a unit, optionally anchored to a reference unit
/// (e.g. a crate that contains 24 bottles).
#[tauri::command]
pub async fn create_unit(
    api: State<'_, ApiState>,
    input: UnitInput,
) -> Result<UnitDto, CommandError> {
    debug!(name = %input.name, "create_unit command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let payload = unit_payload(input)?;
    let row = client.units().create(&payload).await?;
    info!(id = %row.id, "Unit created");
    Ok(UnitDto::from(row))
}

/// Updates a unit.
#[tauri::command]
pub async fn update_unit(
    api: State<'_, ApiState>,
    id: i64,
    input: UnitInput,
) -> Result<UnitDto, CommandError> {
    debug!(id = %id, "update_unit command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let payload = unit_payload(input)?;
    let row = client.units().update(id, &payload).await?;
    info!(id = %id, "Unit updated");
    Ok(UnitDto::from(row))
}

/// Deletes a unit.
#[tauri::command]
pub async fn delete_unit(api: State<'_, ApiState>, id: i64) -> Result<(), CommandError> {
    debug!(id = %id, "delete_unit command");
    let client = (*api).inner();
    require_store_role(client).await?;

    client.units().delete(id).await?;
    info!(id = %id, "Unit deleted");
    Ok(())
}

fn unit_payload(input: UnitInput) -> Result<UnitPayload, CommandError> {
    validate_name("unit name", &input.name)?;
    Ok(UnitPayload {
        unit_name: input.name.trim().to_string(),
        contains: input.contains,
        reference_unit: input.reference_unit_id,
    })
}
