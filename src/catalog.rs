//! # Variant Catalog
//!
//! Discovers resume variant source files and turns them into displayable
//! catalog entries. The catalog is loaded once at startup and never rescanned
//! during a session.

use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

/// One selectable variant in the catalog.
///
/// Immutable once loaded: `name` is the filename with the source extension
/// stripped, `size_label` is a human-readable file size.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantEntry {
    pub name: String,
    pub description: String,
    pub size_label: String,
}

/// Format a file size (in bytes) as a label with one decimal place in KB,
/// or "Unknown size" when the size could not be read.
pub fn size_label(bytes: Option<u64>) -> String {
    match bytes {
        Some(size) => format!("{:.1} KB", size as f64 / 1024.0),
        None => "Unknown size".to_string(),
    }
}

/// Recursively enumerate variant source files under `variants_dir`.
///
/// Returns entries in filesystem traversal order (not sorted). Failing to
/// walk the directory is an error; an empty result is left for the caller to
/// reject, since an empty catalog is not a valid running state.
pub fn discover_variants(variants_dir: &Path, extension: &str) -> Result<Vec<VariantEntry>> {
    if !variants_dir.is_dir() {
        anyhow::bail!(
            "Path '{}' is not a directory",
            variants_dir.display()
        );
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(variants_dir) {
        let entry = entry.with_context(|| {
            format!(
                "Failed to walk variants directory: {}",
                variants_dir.display()
            )
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == extension);
        if !matches {
            continue;
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Invalid filename for variant: {}", path.display()))?
            .to_string();

        let label = size_label(entry.metadata().ok().map(|m| m.len()));

        entries.push(VariantEntry {
            name,
            description: format!("Typst resume variant • {}", label),
            size_label: label,
        });
    }

    Ok(entries)
}
