// ABOUTME: Integration tests for email column detection and preview validation

use pretty_assertions::assert_eq;

use csvenrich::detect::{detect_email_column, email_status, free_mail_count, EmailStatus};
use csvenrich::models::Row;

#[test]
fn detects_email_column_from_header_and_values() {
    let columns = vec![
        "id".to_string(),
        "email".to_string(),
        "signup_date".to_string(),
    ];
    let rows = vec![
        Row::from_pairs([("id", "1"), ("email", "ada@acme.com"), ("signup_date", "2024-01-01")]),
        Row::from_pairs([("id", "2"), ("email", "bob@beta.io"), ("signup_date", "2024-02-02")]),
    ];

    let detection = detect_email_column(&columns, &rows).unwrap();
    assert_eq!(detection.column, "email");
    assert!(detection.confidence > 50);
}

#[test]
fn value_only_detection_scores_below_prefill_threshold() {
    // A column of emails under a non-email header is found, but with low
    // enough confidence that the wizard will not pre-fill it.
    let columns = vec!["primary_contact_point".to_string()];
    let rows = vec![
        Row::from_pairs([("primary_contact_point", "ada@acme.com")]),
        Row::from_pairs([("primary_contact_point", "bob@beta.io")]),
    ];

    let detection = detect_email_column(&columns, &rows).unwrap();
    assert_eq!(detection.column, "primary_contact_point");
    assert!(detection.confidence <= 50);
}

#[test]
fn email_status_classification() {
    assert_eq!(email_status("person@company.co.uk"), EmailStatus::Valid);
    assert_eq!(email_status("no-at-sign"), EmailStatus::Invalid);
    assert_eq!(email_status("two@@company.com"), EmailStatus::Invalid);
    assert_eq!(email_status(""), EmailStatus::Empty);
}

#[test]
fn free_mail_count_covers_all_listed_providers() {
    let rows: Vec<Row> = [
        "a@gmail.com",
        "b@yahoo.com",
        "c@hotmail.com",
        "d@outlook.com",
        "e@aol.com",
        "f@icloud.com",
        "g@acme.com",
        "not-an-email",
    ]
    .iter()
    .map(|e| Row::from_pairs([("email", *e)]))
    .collect();

    assert_eq!(free_mail_count(&rows, "email"), 6);
}
