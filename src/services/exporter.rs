//! Table Export Sink
//!
//! Writes rendered table exports to disk. CSV files land in the user's
//! download directory; print and PDF reports are written to the cache
//! directory and handed to the system browser, whose print dialog does the
//! rest.

use crate::error::Result;
use crate::helpers::{get_or_create_cache_dir, get_or_create_download_dir, unique_file_path};
use crate::table::export::{CSV_FILE_NAME, ReportStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Save CSV text as `table_data.csv` (or `table_data (n).csv`) in `dir`.
pub fn save_csv_in(dir: &Path, csv: &str) -> Result<PathBuf> {
    let path = unique_file_path(dir, CSV_FILE_NAME);
    fs::write(&path, csv)?;
    info!(path = %path.display(), bytes = csv.len(), "CSV exported");
    Ok(path)
}

/// Save CSV text in the download directory.
pub fn save_csv(csv: &str) -> Result<PathBuf> {
    save_csv_in(&get_or_create_download_dir()?, csv)
}

/// Write a report document into `dir`, replacing the previous one.
pub fn write_report_in(dir: &Path, html: &str, style: ReportStyle) -> Result<PathBuf> {
    let path = dir.join(style.file_name());
    fs::write(&path, html)?;
    Ok(path)
}

/// Write a report document and open it in the default browser.
pub fn open_report(html: &str, style: ReportStyle) -> Result<PathBuf> {
    let path = write_report_in(&get_or_create_cache_dir()?, html, style)?;
    open::that(&path)?;
    info!(path = %path.display(), ?style, "Report opened");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_never_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = save_csv_in(dir.path(), "a\nb").expect("first");
        let second = save_csv_in(dir.path(), "c\nd").expect("second");

        assert_eq!(first.file_name().and_then(|n| n.to_str()), Some("table_data.csv"));
        assert_eq!(
            second.file_name().and_then(|n| n.to_str()),
            Some("table_data (1).csv")
        );
        assert_eq!(fs::read_to_string(first).expect("read"), "a\nb");
    }

    #[test]
    fn test_report_file_per_style() {
        let dir = tempfile::tempdir().expect("tempdir");
        let print = write_report_in(dir.path(), "<html></html>", ReportStyle::Print).expect("print");
        let pdf = write_report_in(dir.path(), "<html></html>", ReportStyle::Pdf).expect("pdf");
        assert_ne!(print, pdf);
        assert!(print.exists() && pdf.exists());
    }
}
