//! CSV export of a resolved bill of materials.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::estimate::LineItem;

/// Column header for the items export.
const HEADER: &str = "order_rank,name,quantity,unit_price,line_total";

/// Exports estimate items to a CSV file at the given path.
///
/// Writes a header row followed by one row per item, in the order given.
/// Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `items` - Resolved items, usually `CalculationResult::estimate_items`
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_items_csv(items: &[LineItem], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_items_csv(items, buf)
}

/// Writes estimate items as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_items_csv(items: &[LineItem], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for item in items {
        wtr.write_record(&[
            item.order_rank.to_string(),
            item.name.clone(),
            format!("{:.4}", item.quantity),
            format!("{:.2}", item.unit_price),
            format!("{:.2}", item.line_total()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
