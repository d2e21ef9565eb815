//! Output formatting and result persistence.

use crate::error::Result;
use clap::ValueEnum;
use colored::Colorize;
use reident::config::SimParams;
use reident::monte_carlo::{AccuracyEstimate, AccuracyMatrix};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

/// Output format for results on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Aligned, human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values
    Csv,
}

/// One classifier's estimate, as printed by `reident estimate`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct EstimateRow {
    pub(crate) classifier: String,
    #[serde(flatten)]
    pub(crate) estimate: AccuracyEstimate,
}

/// Results as a grid: one row per sweep point, one column per classifier.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResultGrid {
    parameter: String,
    labels: Vec<String>,
    points: Vec<f64>,
    /// `columns[classifier][point]`
    columns: Vec<Vec<f64>>,
}

impl From<&AccuracyMatrix> for ResultGrid {
    fn from(matrix: &AccuracyMatrix) -> Self {
        Self {
            parameter: matrix.parameter().to_string(),
            labels: matrix.labels().to_vec(),
            points: matrix.parameters().to_vec(),
            columns: matrix.values().to_vec(),
        }
    }
}

impl From<&[EstimateRow]> for ResultGrid {
    fn from(rows: &[EstimateRow]) -> Self {
        Self {
            parameter: "N".to_string(),
            labels: rows.iter().map(|r| r.classifier.clone()).collect(),
            points: rows
                .first()
                .map(|r| vec![r.estimate.n_candidates as f64])
                .unwrap_or_default(),
            columns: rows.iter().map(|r| vec![r.estimate.accuracy]).collect(),
        }
    }
}

impl ResultGrid {
    /// Writes the grid as CSV: parameter column first, then one column per
    /// classifier.
    pub(crate) fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        let mut header = vec![self.parameter.clone()];
        header.extend(self.labels.iter().cloned());
        writer.write_record(&header)?;

        for (i, point) in self.points.iter().enumerate() {
            let mut record = vec![format_point(*point)];
            record.extend(self.columns.iter().map(|col| format!("{:.4}", col[i])));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Renders an aligned text table.
    pub(crate) fn table(&self) -> String {
        let widths: Vec<usize> = self.labels.iter().map(|l| l.len().max(8)).collect();
        let mut out = String::new();

        let _ = write!(out, "{:>8}", self.parameter.bold());
        for (label, width) in self.labels.iter().zip(&widths) {
            let _ = write!(out, "  {:>width$}", label.cyan().bold());
        }
        out.push('\n');

        for (i, point) in self.points.iter().enumerate() {
            let _ = write!(out, "{:>8}", format_point(*point));
            for (col, width) in self.columns.iter().zip(&widths) {
                let _ = write!(out, "  {:>width$.4}", col[i]);
            }
            out.push('\n');
        }
        out
    }
}

/// Pool sizes print as integers, fractions with two decimals.
fn format_point(point: f64) -> String {
    if point.fract() == 0.0 {
        format!("{point:.0}")
    } else {
        format!("{point:.2}")
    }
}

/// Prints a sweep result in the requested format.
pub(crate) fn print_matrix(matrix: &AccuracyMatrix, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print!("{}", ResultGrid::from(matrix).table()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(matrix)?),
        OutputFormat::Csv => ResultGrid::from(matrix).write_csv(std::io::stdout().lock())?,
    }
    Ok(())
}

/// Prints single estimates in the requested format.
pub(crate) fn print_estimates(rows: &[EstimateRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "{:<28} {:>9} {:>9} {:>9}",
                "classifier".bold(),
                "accuracy".bold(),
                "std err".bold(),
                "chance".bold()
            );
            for row in rows {
                println!(
                    "{:<28} {:>9.4} {:>9.4} {:>9.4}",
                    row.classifier.cyan(),
                    row.estimate.accuracy,
                    row.estimate.std_error(),
                    row.estimate.chance_level()
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => ResultGrid::from(rows).write_csv(std::io::stdout().lock())?,
    }
    Ok(())
}

/// Writes `accuracy.csv` and `params.json` into `dir`, creating it if
/// needed.
pub(crate) fn save_results(dir: &Path, grid: &ResultGrid, params: &SimParams) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    grid.write_csv(std::fs::File::create(dir.join("accuracy.csv"))?)?;
    std::fs::write(dir.join("params.json"), params.to_json()?)?;
    tracing::info!(dir = %dir.display(), "results saved");
    Ok(())
}
