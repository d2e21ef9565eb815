//! Dataset loading.
//!
//! The dataset is a CSV file with a header row. The first column identifies
//! the user; every other column is a numeric feature. A user's rows keep
//! their file order, and users are numbered by first appearance.

use crate::error::{CliError, Result};
use reident::dataset::UserRecords;
use reident::Matrix;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Loads per-user records from a CSV file.
pub(crate) fn load_records(path: &Path) -> Result<UserRecords> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let records = read_records(file)?;
    debug!(path = %path.display(), users = records.len(), "dataset loaded");
    Ok(records)
}

/// Parses per-user records from CSV text.
pub(crate) fn read_records<R: Read>(input: R) -> Result<UserRecords> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
    let n_features = reader.headers()?.len().saturating_sub(1);
    if n_features == 0 {
        return Err(CliError::InvalidData(
            "need a user column and at least one feature column".to_string(),
        ));
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Vec<f32>> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let user = record.get(0).unwrap_or_default().trim().to_string();
        let slot = *index.entry(user).or_insert_with(|| {
            rows.push(Vec::new());
            rows.len() - 1
        });
        for (col, field) in record.iter().enumerate().skip(1) {
            let value: f32 = field.trim().parse().map_err(|_| {
                // header is line 1
                CliError::InvalidData(format!(
                    "line {}, column {}: '{field}' is not a number",
                    line + 2,
                    col + 1
                ))
            })?;
            rows[slot].push(value);
        }
    }

    if rows.is_empty() {
        return Err(CliError::InvalidData("no data rows".to_string()));
    }

    let users = rows
        .into_iter()
        .map(|data| {
            let n_rows = data.len() / n_features;
            Matrix::from_vec(n_rows, n_features, data)
                .map_err(|e| CliError::InvalidData(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(UserRecords::new(users)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_rows_by_first_appearance() {
        let csv = "user,a,b\nbob,1,2\nalice,3,4\nbob,5,6\n";
        let records = read_records(csv.as_bytes()).expect("parse");

        assert_eq!(records.len(), 2);
        assert_eq!(records.n_features(), 2);
        assert_eq!(records.user(0).as_slice(), &[1.0, 2.0, 5.0, 6.0]);
        assert_eq!(records.user(1).as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn test_rejects_non_numeric_feature() {
        let err = read_records("user,a\nu1,1.5\nu1,oops\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::InvalidData(ref m) if m.contains("line 3")));
    }

    #[test]
    fn test_rejects_missing_features() {
        let err = read_records("user\nu1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::InvalidData(_)));
    }

    #[test]
    fn test_rejects_empty_body() {
        let err = read_records("user,a\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::InvalidData(_)));
    }

    #[test]
    fn test_ragged_rows_are_csv_errors() {
        let err = read_records("user,a,b\nu1,1,2\nu2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::Csv(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_records(Path::new("/nonexistent/users.csv")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}
