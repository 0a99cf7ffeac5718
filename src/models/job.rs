// ABOUTME: Dataset rows and the finalized enrichment job configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::EnrichmentField;

/// One record of the uploaded dataset: column name to raw string value.
///
/// Rows are immutable once loaded; the wizard only reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    values: BTreeMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Value for a column, empty-string when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map_or("", String::as_str)
    }
}

/// Finalized job configuration handed off to the enrichment engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentJob {
    pub email_column: String,
    pub fields: Vec<EnrichmentField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_missing_column_reads_empty() {
        let row = Row::from_pairs([("email", "a@acme.com")]);
        assert_eq!(row.get("email"), "a@acme.com");
        assert_eq!(row.get("company"), "");
    }

    #[test]
    fn test_job_serializes_to_json() {
        let job = EnrichmentJob {
            email_column: "email".to_string(),
            fields: vec![],
        };
        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains("\"email_column\":\"email\""));
    }
}
