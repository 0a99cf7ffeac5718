// ABOUTME: CSV dataset loading: headers become columns, records become rows

use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::models::Row;

/// The loaded dataset: column order as it appeared in the file, plus rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Read a CSV file into a dataset.
///
/// Malformed CSV is a startup error, reported before the terminal UI is
/// entered. Records shorter than the header are padded with empty cells by
/// the flexible reader; extra cells are dropped.
pub fn load_csv(path: &Path, delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header from {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if columns.is_empty() {
        return Err(anyhow!("CSV file {} has no header row", path.display()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Malformed CSV in {}", path.display()))?;
        let mut row = Row::new();
        for (i, column) in columns.iter().enumerate() {
            row.insert(column.clone(), record.get(i).unwrap_or(""));
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!("CSV file {} contains no data rows", path.display()));
    }

    Ok(Dataset { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("csvenrich-test-{}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_basic_csv() {
        let path = write_temp("email,company\na@acme.com,Acme\nb@example.org,\n");
        let dataset = load_csv(&path, b',').unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(dataset.columns, vec!["email", "company"]);
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.rows[0].get("email"), "a@acme.com");
        assert_eq!(dataset.rows[1].get("company"), "");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_csv(Path::new("/nonexistent/data.csv"), b',');
        assert!(result.is_err());
    }
}
