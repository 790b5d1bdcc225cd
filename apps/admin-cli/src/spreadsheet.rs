//! Reads the first sheet (or a named one) of an Excel/ODS workbook into raw
//! import rows keyed by the header row.
//!
//! Every row keeps its data row index (0-based, header excluded) so the
//! preview's row numbers match the sheet even when blank rows are skipped.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};

use catalog_core::import::{Cell, RawRow};

/// A data row and its index below the header.
pub type SheetRow = (usize, RawRow);

/// Loads the data rows of a workbook sheet.
pub fn read_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<SheetRow>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("{} has no sheets", path.display()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading sheet '{}'", sheet_name))?;

    Ok(rows_from_range(&range))
}

/// First row is the header. Blank rows are skipped; cells under a blank
/// header are dropped.
pub fn rows_from_range(range: &Range<Data>) -> Vec<SheetRow> {
    // The range starts at the first used cell, not necessarily row 1.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let columns: Vec<String> = header
        .iter()
        .map(|h| h.to_string().trim().to_string())
        .collect();

    rows.enumerate()
        .filter_map(|(position, row)| {
            let raw: RawRow = columns
                .iter()
                .zip(row)
                .filter(|(column, _)| !column.is_empty())
                .map(|(column, data)| (column.clone(), to_cell(data)))
                .filter(|(_, cell)| *cell != Cell::Empty)
                .collect();
            (!raw.is_empty()).then_some((first_row + position, raw))
        })
        .collect()
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::import::{normalize_row, ImportPreview};
    use catalog_core::MAX_IMPORT_ROWS;

    fn sheet(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), value.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_header_keys_rows() {
        let range = sheet(&[
            &[text("Product"), text("Rate"), text("Stock")],
            &[text("Rice"), Data::Float(50.0), Data::Int(0)],
            &[text("Tea"), Data::Float(120.5), Data::Int(7)],
        ]);
        let rows = rows_from_range(&range);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 0);
        assert_eq!(rows[0].1["Product"], Cell::Text("Rice".to_string()));
        assert_eq!(rows[1].1["Rate"], Cell::Number(120.5));
        assert_eq!(rows[1].1["Stock"], Cell::Number(7.0));
    }

    #[test]
    fn test_blank_rows_and_headers_skipped() {
        let range = sheet(&[
            &[text(" Name "), Data::Empty, text("Rate")],
            &[Data::Empty, Data::Empty, Data::Empty],
            &[text("Dal"), text("ignored"), Data::Float(90.0)],
        ]);
        let rows = rows_from_range(&range);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[0].1.len(), 2);
        assert!(rows[0].1.contains_key("Name"));
    }

    #[test]
    fn test_row_numbers_follow_the_sheet() {
        let range = sheet(&[
            &[text("Product"), text("Rate")],
            &[text("Rice"), Data::Float(50.0)],
            &[Data::Empty, Data::Empty],
            &[Data::Empty, Data::Empty],
            &[text("Tea"), Data::Empty],
        ]);
        let rows = rows_from_range(&range);
        let preview = ImportPreview::build_indexed(
            rows.iter().map(|(index, row)| (*index, row)),
            MAX_IMPORT_ROWS,
        )
        .unwrap();

        let numbers: Vec<_> = preview.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, [2, 5]);
        assert!(!preview.rows[1].valid);
    }

    #[test]
    fn test_header_below_first_row() {
        let mut range = Range::new((2, 0), (3, 1));
        range.set_value((2, 0), text("Product"));
        range.set_value((2, 1), text("Rate"));
        range.set_value((3, 0), text("Dal"));
        range.set_value((3, 1), Data::Float(90.0));

        let rows = rows_from_range(&range);
        assert_eq!(rows.len(), 1);
        // Header on sheet row 3, so the only data row is row 4.
        assert_eq!(normalize_row(&rows[0].1, rows[0].0).row_number, 4);
    }

    #[test]
    fn test_rows_feed_the_normalizer() {
        let range = sheet(&[
            &[text("Item name"), text("Sale price"), text("Unit")],
            &[text("Oil"), Data::Float(180.0), text("liter")],
        ]);
        let rows = rows_from_range(&range);
        let row = normalize_row(&rows[0].1, rows[0].0);

        assert!(row.valid);
        assert_eq!(row.units[0].name, "liter");
    }
}
