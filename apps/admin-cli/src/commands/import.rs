use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use catalog_client::CatalogClient;
use catalog_core::import::ImportPreview;

use super::print_json;
use crate::spreadsheet;

pub struct ImportOptions {
    pub file: PathBuf,
    pub sheet: Option<String>,
    pub dry_run: bool,
    pub max_rows: usize,
}

pub async fn run(client: &CatalogClient, options: &ImportOptions, json: bool) -> Result<()> {
    let rows = spreadsheet::read_rows(&options.file, options.sheet.as_deref())?;
    let preview = ImportPreview::build_indexed(
        rows.iter().map(|(index, row)| (*index, row)),
        options.max_rows,
    )
    .with_context(|| format!("previewing {}", options.file.display()))?;

    info!(
        file = %options.file.display(),
        rows = preview.len(),
        valid = preview.valid_count(),
        "Sheet normalized"
    );

    if json && options.dry_run {
        return print_json(&preview);
    }

    if !json {
        print_preview(&preview);
    }

    if options.dry_run {
        return Ok(());
    }

    let batch = preview.batch()?;
    let submitted = batch.products.len();
    let result = client.bulk_create_products(&batch).await?;
    info!(submitted, created = result.success, "Bulk import finished");

    if json {
        print_json(&result)
    } else {
        println!("Imported {} products", result.success);
        Ok(())
    }
}

fn print_preview(preview: &ImportPreview) {
    println!(
        "{} rows: {} valid, {} invalid",
        preview.len(),
        preview.valid_count(),
        preview.invalid_count()
    );

    for row in preview.invalid_rows() {
        let issues: Vec<String> = row.issues.iter().map(ToString::to_string).collect();
        let name = if row.name.is_empty() { "(no name)" } else { row.name.as_str() };
        println!("  row {:>5}  {:<30} {}", row.row_number, name, issues.join(", "));
    }
}
