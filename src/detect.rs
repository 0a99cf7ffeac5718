// ABOUTME: Email column auto-detection heuristics, email validation for the
// preview table, and the consumer-mail-provider warning count

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Row;

lazy_static! {
    /// Fixed pattern used for preview styling and detection sampling.
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex");
}

/// Consumer mail providers whose rows the enrichment engine will likely skip.
pub const FREE_MAIL_DOMAINS: [&str; 6] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
];

/// Column names that strongly suggest an email column.
const EMAIL_HEADER_HINTS: [&str; 6] = [
    "email",
    "e-mail",
    "email_address",
    "emailaddress",
    "mail",
    "contact_email",
];

/// Number of rows sampled when scoring a column's values.
const SAMPLE_SIZE: usize = 50;

/// Detector output: the best-guess column and a 0-100 confidence score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub column: String,
    pub confidence: u8,
}

/// Validation status of one email cell in the preview table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStatus {
    Valid,
    Invalid,
    Empty,
}

/// Classify an email cell value against the fixed pattern.
pub fn email_status(value: &str) -> EmailStatus {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        EmailStatus::Empty
    } else if EMAIL_REGEX.is_match(trimmed) {
        EmailStatus::Valid
    } else {
        EmailStatus::Invalid
    }
}

/// Scan columns and return the most plausible email column, if any.
///
/// Scoring combines a header-name hint (exact match on a known email-ish
/// name scores high, a substring match lower) with the fraction of sampled
/// non-empty values that parse as email addresses. A column with no name
/// hint and no matching values scores zero and is never returned.
pub fn detect_email_column(columns: &[String], rows: &[Row]) -> Option<Detection> {
    let mut best: Option<Detection> = None;

    for column in columns {
        let lowered = column.trim().to_ascii_lowercase();
        let header_score: u32 = if EMAIL_HEADER_HINTS.contains(&lowered.as_str()) {
            60
        } else if lowered.contains("email") || lowered.contains("mail") {
            35
        } else {
            0
        };

        let mut sampled = 0u32;
        let mut matching = 0u32;
        for row in rows.iter().take(SAMPLE_SIZE) {
            let value = row.get(column);
            if value.trim().is_empty() {
                continue;
            }
            sampled += 1;
            if email_status(value) == EmailStatus::Valid {
                matching += 1;
            }
        }
        let value_score: u32 = if sampled > 0 { matching * 40 / sampled } else { 0 };

        let confidence = (header_score + value_score).min(100) as u8;
        if confidence == 0 {
            continue;
        }
        if best.as_ref().map_or(true, |b| confidence > b.confidence) {
            best = Some(Detection {
                column: column.clone(),
                confidence,
            });
        }
    }

    best
}

/// Count rows whose email domain is on the consumer-provider list.
///
/// These are surfaced as a warning on step 1: the enrichment engine will
/// likely skip personal addresses.
pub fn free_mail_count(rows: &[Row], column: &str) -> usize {
    rows.iter()
        .filter(|row| {
            let value = row.get(column).trim();
            value
                .rsplit_once('@')
                .map(|(_, domain)| {
                    let domain = domain.to_ascii_lowercase();
                    FREE_MAIL_DOMAINS.contains(&domain.as_str())
                })
                .unwrap_or(false)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(emails: &[&str]) -> Vec<Row> {
        emails
            .iter()
            .map(|e| Row::from_pairs([("email", *e)]))
            .collect()
    }

    #[test]
    fn test_email_status() {
        assert_eq!(email_status("a@acme.com"), EmailStatus::Valid);
        assert_eq!(email_status("  b@sub.acme.io "), EmailStatus::Valid);
        assert_eq!(email_status("not-an-email"), EmailStatus::Invalid);
        assert_eq!(email_status("a@acme"), EmailStatus::Invalid);
        assert_eq!(email_status(""), EmailStatus::Empty);
        assert_eq!(email_status("   "), EmailStatus::Empty);
    }

    #[test]
    fn test_detects_named_email_column_with_high_confidence() {
        let columns = vec!["name".to_string(), "email".to_string()];
        let data = vec![
            Row::from_pairs([("name", "Ada"), ("email", "ada@acme.com")]),
            Row::from_pairs([("name", "Bob"), ("email", "bob@example.org")]),
        ];
        let detection = detect_email_column(&columns, &data).unwrap();
        assert_eq!(detection.column, "email");
        assert!(detection.confidence > 50);
    }

    #[test]
    fn test_detects_by_values_when_header_is_unhelpful() {
        let columns = vec!["contact".to_string(), "city".to_string()];
        let data = vec![
            Row::from_pairs([("contact", "ada@acme.com"), ("city", "Berlin")]),
            Row::from_pairs([("contact", "bob@example.org"), ("city", "Oslo")]),
        ];
        let detection = detect_email_column(&columns, &data).unwrap();
        assert_eq!(detection.column, "contact");
    }

    #[test]
    fn test_no_detection_for_non_email_data() {
        let columns = vec!["city".to_string()];
        let data = vec![Row::from_pairs([("city", "Berlin")])];
        assert!(detect_email_column(&columns, &data).is_none());
    }

    #[test]
    fn test_free_mail_count_mixed_providers() {
        // One of the two rows is a personal address.
        let data = rows(&["a@gmail.com", "b@acme.com"]);
        assert_eq!(free_mail_count(&data, "email"), 1);
    }

    #[test]
    fn test_free_mail_count_is_case_insensitive() {
        let data = rows(&["a@GMAIL.com", "b@Yahoo.COM", "c@acme.com", ""]);
        assert_eq!(free_mail_count(&data, "email"), 2);
    }
}
