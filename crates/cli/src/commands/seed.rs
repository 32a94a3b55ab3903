//! Seed the database with a product catalog.
//!
//! Reads warehouses, products and stock levels from a YAML file, validates
//! the whole file, then writes it through the API repositories.

use std::path::Path;

use tracing::{error, info};

use bazaar_api::catalog::{CatalogError, load_catalog, seed_catalog};
use bazaar_api::db;

/// Seed a catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file is missing or invalid, the database URL is
/// not set, or the database cannot be reached.
pub async fn catalog(file_path: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file_path.exists() {
        return Err(format!("File not found: {}", file_path.display()).into());
    }

    info!(path = %file_path.display(), "Loading catalog from file");

    // Validate before connecting to the database
    let catalog = match load_catalog(file_path).await {
        Ok(catalog) => catalog,
        Err(CatalogError::Invalid(errors)) => {
            error!("Catalog validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
        Err(e) => return Err(e.into()),
    };

    if dry_run {
        info!("Catalog is valid (dry run, nothing written)");
        return Ok(());
    }

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let result = seed_catalog(&pool, &catalog).await?;

    info!("Seeding complete!");
    info!(
        "  Warehouses: {} created, {} reused",
        result.warehouses_created, result.warehouses_reused
    );
    info!(
        "  Products: {} created, {} skipped (already exist)",
        result.products_created, result.products_skipped
    );
    info!("  Stock levels written: {}", result.stock_levels);

    if !result.errors.is_empty() {
        error!("  Errors: {}", result.errors.len());
        for (name, err) in &result.errors {
            error!("    - {name}: {err}");
        }
        return Err(format!("{} entries failed to seed", result.errors.len()).into());
    }

    Ok(())
}
