#![deny(warnings)]

//! Spreadsheet-friendly export of a monthly projection.
//!
//! The format is part of the external contract: a fixed header followed by
//! one comma-separated row of plain integers per month, joined with `\n`.

use sim_core::MonthlyResult;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Header row, including unit suffixes. Numeric cells never carry units.
pub const EXPORT_HEADER: &str = "Month,Revenue ($),Total Users,Expenses ($),Profit ($)";

/// File name used when the caller does not choose one.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "monetizeai_simulation.csv";

const COLUMNS: usize = 5;

/// Errors produced while reading or writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("missing or unexpected header: {0:?}")]
    Header(String),
    #[error("line {line}: expected 5 columns, found {found}")]
    ColumnCount { line: usize, found: usize },
    #[error("line {line}: not an integer: {cell:?}")]
    NotInteger { line: usize, cell: String },
    #[error("line {line}: profit {profit} != revenue - expenses")]
    ProfitMismatch { line: usize, profit: i64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed export row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportRow {
    pub month: u32,
    pub revenue: i64,
    pub users: i64,
    pub expenses: i64,
    pub profit: i64,
}

impl ExportRow {
    /// The monthly result this row was produced from.
    pub fn to_result(&self) -> MonthlyResult {
        MonthlyResult {
            month: self.month,
            revenue: self.revenue,
            users: self.users,
            expenses: self.expenses,
        }
    }
}

/// Render results as delimited text. Profit is recomputed per row.
///
/// Example:
/// let text = to_delimited_text(&[]);
/// assert_eq!(text, EXPORT_HEADER);
pub fn to_delimited_text(results: &[MonthlyResult]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(EXPORT_HEADER.to_string());
    for r in results {
        lines.push(format!(
            "{},{},{},{},{}",
            r.month,
            r.revenue,
            r.users,
            r.expenses,
            r.profit()
        ));
    }
    lines.join("\n")
}

/// Parse text produced by [`to_delimited_text`].
///
/// Profit is checked against revenue - expenses saturated at the i64 bounds,
/// matching what the writer emits for extreme rows.
///
/// Accepts `\r\n` line endings and a trailing newline, since spreadsheets
/// tend to add both on re-save.
pub fn parse_delimited_text(text: &str) -> Result<Vec<ExportRow>, ExportError> {
    let mut lines = text.lines();
    match lines.next() {
        Some(h) if h.trim_end() == EXPORT_HEADER => {}
        other => return Err(ExportError::Header(other.unwrap_or_default().to_string())),
    }
    let mut rows = Vec::new();
    for (idx, raw) in lines.enumerate() {
        let line = idx + 2;
        let raw = raw.trim_end();
        if raw.is_empty() {
            continue;
        }
        let cells: Vec<&str> = raw.split(',').collect();
        if cells.len() != COLUMNS {
            return Err(ExportError::ColumnCount {
                line,
                found: cells.len(),
            });
        }
        let mut nums = [0i64; COLUMNS];
        for (slot, cell) in nums.iter_mut().zip(&cells) {
            *slot = cell.parse().map_err(|_| ExportError::NotInteger {
                line,
                cell: cell.to_string(),
            })?;
        }
        let month = u32::try_from(nums[0]).map_err(|_| ExportError::NotInteger {
            line,
            cell: cells[0].to_string(),
        })?;
        let row = ExportRow {
            month,
            revenue: nums[1],
            users: nums[2],
            expenses: nums[3],
            profit: nums[4],
        };
        // same saturating rule the writer uses
        if row.profit != row.to_result().profit() {
            return Err(ExportError::ProfitMismatch {
                line,
                profit: row.profit,
            });
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Write the export to `path`, replacing any existing file.
pub fn write_export<P: AsRef<Path>>(path: P, results: &[MonthlyResult]) -> Result<(), ExportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_delimited_text(results))?;
    info!(path = %path.display(), rows = results.len(), "export written");
    Ok(())
}
