use super::types::{Catalog, CATALOG_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default catalog file path (~/.config/laptop-rank/catalog.json)
pub fn get_catalog_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("catalog.json"))
}

/// Load the catalog from a JSON file
///
/// If the file doesn't exist, returns a new empty catalog.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no catalog file yet, starting empty");
        return Ok(Catalog::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open catalog file at {}", path.display()))?;

    let catalog: Catalog = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load catalog from {}", path.display()))?;

    if catalog.version != CATALOG_VERSION {
        anyhow::bail!("Unsupported catalog version: {}", catalog.version);
    }

    tracing::debug!(path = %path.display(), laptops = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Save the catalog to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, catalog).context("Failed to serialize catalog")?;

    file.commit().context("Failed to save catalog")?;

    tracing::debug!(path = %path.display(), laptops = catalog.len(), "catalog saved");
    Ok(())
}
