use callvalue_core::{load_catalog, AppConfig, DEFAULT_PRODUCT_KEY};

/// Print the catalog at the configured path, one `key  price` line each.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or fails validation.
pub(crate) fn run_catalog(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(&config.catalog_path)?;

    println!("catalog: {}", config.catalog_path.display());
    for (key, price) in &catalog.products {
        println!("{key:>8}  {price:.2}");
    }
    println!("{DEFAULT_PRODUCT_KEY:>8}  {:.2}", catalog.default);

    Ok(())
}
