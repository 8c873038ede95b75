//! Subcommand implementations.

use anyhow::{Context, Result};
use pagecraft_core::relations::{self, Direction};
use pagecraft_core::{CanvasConfig, CanvasDocument, CanvasItem, SearchRequest, storage};
use std::path::Path;

/// Read a template and place its items on a page with the given config.
fn load_document(file: &Path, config: CanvasConfig) -> Result<CanvasDocument> {
    let items = storage::import_from_file(file)
        .with_context(|| format!("importing {}", file.display()))?;
    let mut document = CanvasDocument::with_config(config)?;
    document.replace_items(items);
    log::info!("Loaded {} items from {}", document.len(), file.display());
    Ok(document)
}

fn describe(items: &[CanvasItem], neighbor: Option<usize>) -> String {
    match neighbor {
        Some(index) => format!("#{} {}", index, items[index].kind),
        None => "-".to_string(),
    }
}

pub fn inspect(file: &Path, config: CanvasConfig) -> Result<()> {
    let document = load_document(file, config)?;
    let items = document.items();

    println!("{} items", items.len());
    for (kind, count) in document.kind_counts() {
        println!("  {:<8} {}", kind, count);
    }

    for (index, set) in relations::analyze(items).iter().enumerate() {
        let item = &items[index];
        println!(
            "#{} {} at ({}, {}) {}x{}",
            index, item.kind, item.position.x, item.position.y, item.size.width, item.size.height
        );
        for direction in Direction::ALL {
            println!("    {:<6} {}", direction.name(), describe(items, set.get(direction)));
        }
    }
    Ok(())
}

pub fn convert(file: &Path, output: &Path, config: CanvasConfig) -> Result<()> {
    let document = load_document(file, config)?;
    let path = storage::export_to_file(document.items(), output)
        .with_context(|| format!("exporting to {}", output.display()))?;
    println!("{}", path.display());
    Ok(())
}

pub fn search_request(file: &Path, config: CanvasConfig) -> Result<()> {
    let document = load_document(file, config)?;
    let request = SearchRequest::from_items(document.items())?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}
