//! Catalog command - list and validate the product catalog

use anyhow::{Context, Result};
use product_recs_adapters::catalog::FsCatalogSource;
use product_recs_domain::{Catalog, CatalogSource, ComplementarityMap};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::args::{CatalogArgs, CatalogCommands};
use crate::config::AppConfig;

pub async fn execute(args: CatalogArgs, config_path: Option<PathBuf>) -> Result<()> {
    match args.command {
        CatalogCommands::List {
            catalog,
            category,
            json,
        } => list_products(catalog, category, json, config_path).await,
        CatalogCommands::Validate { catalog } => validate_catalog(catalog, config_path).await,
    }
}

fn catalog_path(catalog: Option<PathBuf>, config_path: Option<&Path>) -> Result<PathBuf> {
    match catalog {
        Some(path) => Ok(path),
        None => Ok(AppConfig::load(config_path)
            .context("Failed to load configuration")?
            .catalog
            .path),
    }
}

async fn list_products(
    catalog: Option<PathBuf>,
    category: Option<String>,
    json: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let path = catalog_path(catalog, config_path.as_deref())?;
    let products = FsCatalogSource::new(&path)
        .load()
        .await
        .context("Failed to load catalog")?;
    let catalog = Catalog::new(products);

    let listed: Vec<_> = match category.as_deref() {
        Some(category) => catalog.by_category(category).collect(),
        None => catalog.products().iter().collect(),
    };

    if json {
        let output = serde_json::json!({
            "count": listed.len(),
            "products": listed,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Products ({} found)", listed.len());
        println!("=================");
        println!();

        for product in listed {
            let price = product
                .numeric_price()
                .map(|p| format!("${:.2}", p))
                .unwrap_or_else(|| "n/a".to_string());
            println!("{}: {}", product.id, product.name);
            println!("  Category: {}", product.category);
            println!("  Brand: {}", product.brand);
            println!("  Price: {}", price);
            if let Some(rating) = product.rating {
                println!("  Rating: {:.1}", rating);
            }
            println!();
        }
    }

    Ok(())
}

async fn validate_catalog(catalog: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let path = catalog_path(catalog, config_path.as_deref())?;
    let products = FsCatalogSource::new(&path)
        .load()
        .await
        .context("Failed to load catalog")?;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for product in &products {
        if product.id.trim().is_empty() {
            errors.push(format!("Product '{}' has an empty id", product.name));
        } else if !seen.insert(product.id.as_str()) {
            errors.push(format!("Duplicate product id: {}", product.id));
        }
        if product.numeric_price().is_none() {
            warnings.push(format!(
                "Product {} has a non-numeric price and will never be recommended",
                product.id
            ));
        }
        if product.category.trim().is_empty() {
            warnings.push(format!("Product {} has no category", product.id));
        }
    }

    let catalog = Catalog::new(products);
    let report = ComplementarityMap::standard().validate(catalog.categories());
    for category in &report.unmapped {
        warnings.push(format!(
            "Category '{}' has no complementary pairings",
            category
        ));
    }

    println!(
        "Catalog {} ({} products, {} categories)",
        path.display(),
        catalog.len(),
        catalog.categories().len()
    );

    for warning in &warnings {
        println!("  warning: {}", warning);
    }

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  error: {}", error);
        }
        anyhow::bail!("Validation failed with {} error(s)", errors.len());
    }

    println!("Catalog is valid.");
    Ok(())
}
