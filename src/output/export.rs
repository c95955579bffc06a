use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use crate::scoring::RankedCandidate;

/// Spreadsheet header row, one column per exported field
pub const CSV_HEADERS: [&str; 5] = ["name", "WP", "Rank WP", "MAUT", "Rank MAUT"];

/// Write ranked rows as CSV with a header row. Scores are written at full
/// precision so rows that rank differently never export equal scores.
pub fn write_csv<W: Write>(writer: W, rows: &[&RankedCandidate]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(CSV_HEADERS)
        .context("Failed to write CSV header")?;

    for row in rows {
        csv_writer
            .write_record([
                row.name.clone(),
                row.wp.to_string(),
                row.wp_rank.to_string(),
                row.maut.to_string(),
                row.maut_rank.to_string(),
            ])
            .with_context(|| format!("Failed to write CSV row for '{}'", row.name))?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Export ranked rows to a CSV file, replacing it atomically
pub fn export_csv(path: &Path, rows: &[&RankedCandidate]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    write_csv(&mut file, rows)?;

    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "ranking exported");
    Ok(())
}
