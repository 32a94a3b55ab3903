//! Catalog seeding from YAML.
//!
//! A catalog file lists warehouses and products, with the stock each
//! warehouse holds for every product:
//!
//! ```yaml
//! warehouses:
//!   - name: Rotterdam
//!     address:
//!       line1: 1 Dock Road
//!       city: Rotterdam
//!       postal_code: 3011 AA
//!       country_code: NL
//!
//! products:
//!   - name: Enamel mug
//!     description: 350 ml, speckled blue
//!     price: "12.50"
//!     stock:
//!       Rotterdam: 40
//! ```
//!
//! Seeding is repeatable: warehouses are matched by name, existing products
//! are left unchanged, and stock levels are upserted.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};

use bazaar_core::{AddressableType, ProductId, WarehouseId};

use crate::db::{
    AddressRepository, ProductRepository, RepositoryError, StockRepository, WarehouseRepository,
};
use crate::models::{AddressInput, CreateProductInput, CreateStockInput, WarehouseInput};

/// Parsed catalog file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub warehouses: Vec<CatalogWarehouse>,
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
}

/// A warehouse entry, optionally with its address.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogWarehouse {
    pub name: String,
    #[serde(default)]
    pub address: Option<AddressInput>,
}

/// A product entry with per-warehouse stock levels.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    /// Quantity keyed by warehouse name.
    #[serde(default)]
    pub stock: BTreeMap<String, i32>,
}

impl CatalogProduct {
    fn to_input(&self) -> CreateProductInput {
        CreateProductInput {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }
}

/// Result of a seeding run.
#[derive(Debug, Default)]
pub struct SeedResult {
    /// Warehouses inserted.
    pub warehouses_created: u64,
    /// Warehouses that already existed and were reused.
    pub warehouses_reused: u64,
    /// Products inserted.
    pub products_created: u64,
    /// Products skipped because one with the same name exists.
    pub products_skipped: u64,
    /// Stock levels written.
    pub stock_levels: u64,
    /// Errors encountered (entry name, error message).
    pub errors: Vec<(String, String)>,
}

/// Errors that abort loading or seeding a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{} validation errors found", .0.len())]
    Invalid(Vec<String>),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Read and validate a catalog file.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read or parsed, or if any
/// entry fails validation.
pub async fn load_catalog(path: &Path) -> Result<CatalogFile, CatalogError> {
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        return Err(CatalogError::Invalid(errors));
    }

    info!(
        warehouses = catalog.warehouses.len(),
        products = catalog.products.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Validate a catalog without touching the database.
///
/// Returns every problem found; an empty list means the catalog is valid.
#[must_use]
pub fn validate_catalog(catalog: &CatalogFile) -> Vec<String> {
    let mut errors = Vec::new();

    let mut warehouse_names = HashSet::new();
    for (i, warehouse) in catalog.warehouses.iter().enumerate() {
        let name = warehouse.name.trim();
        if let Err(e) = (WarehouseInput { name: warehouse.name.clone() }).validate() {
            errors.push(format!("Warehouse at index {i}: {e}"));
        }
        if !name.is_empty() && !warehouse_names.insert(name) {
            errors.push(format!("Duplicate warehouse: {name}"));
        }
        if let Some(Err(e)) = warehouse.address.as_ref().map(AddressInput::validate) {
            errors.push(format!("Address for warehouse {name}: {e}"));
        }
    }

    let mut product_names = HashSet::new();
    for (i, product) in catalog.products.iter().enumerate() {
        let name = product.name.trim();
        if let Err(e) = product.to_input().validate() {
            errors.push(format!("Product at index {i}: {e}"));
        }
        if !name.is_empty() && !product_names.insert(name) {
            errors.push(format!("Duplicate product: {name}"));
        }
        for (warehouse, quantity) in &product.stock {
            if !warehouse_names.contains(warehouse.trim()) {
                errors.push(format!(
                    "Unknown warehouse '{warehouse}' in stock for product: {name}"
                ));
            }
            if *quantity < 0 {
                errors.push(format!(
                    "Negative quantity {quantity} at '{warehouse}' for product: {name}"
                ));
            }
        }
    }

    errors
}

/// Write a validated catalog to the database.
///
/// Failures on individual entries are collected in [`SeedResult::errors`]
/// and do not stop the run.
///
/// # Errors
///
/// Returns `CatalogError::Repository` if a warehouse cannot be found or
/// created.
pub async fn seed_catalog(
    pool: &PgPool,
    catalog: &CatalogFile,
) -> Result<SeedResult, CatalogError> {
    let mut result = SeedResult::default();
    let warehouses = WarehouseRepository::new(pool);
    let addresses = AddressRepository::new(pool);
    let products = ProductRepository::new(pool);
    let stock = StockRepository::new(pool);

    let mut warehouse_ids: HashMap<&str, WarehouseId> = HashMap::new();
    for entry in &catalog.warehouses {
        let name = entry.name.trim();
        let id = if let Some(existing) = warehouses.find_by_name(name).await? {
            result.warehouses_reused += 1;
            existing.id
        } else {
            let created = warehouses
                .create(&WarehouseInput { name: name.to_string() })
                .await?;
            result.warehouses_created += 1;
            if let Some(address) = &entry.address {
                addresses
                    .create(AddressableType::Warehouse, created.id.as_i32(), address)
                    .await?;
            }
            created.id
        };
        warehouse_ids.insert(name, id);
    }

    for entry in &catalog.products {
        let product_id = match resolve_product(&products, entry, &mut result).await {
            Ok(id) => id,
            Err(e) => {
                warn!(product = %entry.name, error = %e, "Failed to seed product");
                result.errors.push((entry.name.clone(), e.to_string()));
                continue;
            }
        };

        for (warehouse, quantity) in &entry.stock {
            let Some(&warehouse_id) = warehouse_ids.get(warehouse.trim()) else {
                result
                    .errors
                    .push((entry.name.clone(), format!("unknown warehouse {warehouse}")));
                continue;
            };
            let input = CreateStockInput {
                product_id,
                warehouse_id,
                quantity: *quantity,
            };
            match stock.set_level(&input).await {
                Ok(_) => result.stock_levels += 1,
                Err(e) => result.errors.push((entry.name.clone(), e.to_string())),
            }
        }
    }

    info!(
        warehouses_created = result.warehouses_created,
        products_created = result.products_created,
        products_skipped = result.products_skipped,
        stock_levels = result.stock_levels,
        "Catalog seeded"
    );
    Ok(result)
}

async fn resolve_product(
    products: &ProductRepository<'_>,
    entry: &CatalogProduct,
    result: &mut SeedResult,
) -> Result<ProductId, RepositoryError> {
    if let Some(existing) = products.find_by_name(&entry.name).await? {
        result.products_skipped += 1;
        return Ok(existing.id);
    }

    let created = products.create(&entry.to_input()).await?;
    result.products_created += 1;
    Ok(created.id)
}
