// ABOUTME: Field suggestion client: turns a free-text prompt into field
// descriptors via the generate-fields endpoint

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::models::FieldType;

/// A field descriptor returned by the endpoint, pending user acceptance.
///
/// Suggestions carry no machine identifier; one is assigned on accept so it
/// is unique against whatever is selected at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedField {
    pub display_name: String,
    pub description: String,
    pub field_type: FieldType,
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("request to suggestion endpoint failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("suggestion endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("suggestion endpoint rejected the prompt")]
    Rejected,
    #[error("suggestion endpoint returned a malformed payload")]
    Malformed,
}

#[derive(Debug, Serialize)]
struct GenerateFieldsRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateFieldsResponse {
    success: bool,
    data: Option<GeneratedData>,
}

#[derive(Debug, Deserialize)]
struct GeneratedData {
    fields: Vec<GeneratedDescriptor>,
}

#[derive(Debug, Deserialize)]
struct GeneratedDescriptor {
    #[serde(rename = "displayName")]
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type", default)]
    field_type: Option<String>,
}

/// HTTP client for the field-suggestion service.
#[derive(Debug, Clone)]
pub struct SuggestionClient {
    client: Client,
    base_url: String,
}

impl SuggestionClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("csvenrich/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// POST the prompt and map the response into suggested fields.
    ///
    /// Any non-2xx status, `success: false`, or missing payload is a
    /// failure; the caller surfaces it as a transient notification and
    /// keeps prior state.
    pub async fn generate_fields(&self, prompt: &str) -> Result<Vec<SuggestedField>, SuggestError> {
        debug!("Requesting field suggestions for prompt ({} chars)", prompt.len());

        let response = self
            .client
            .post(format!("{}/api/generate-fields", self.base_url))
            .json(&GenerateFieldsRequest { prompt })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SuggestError::Status(response.status()));
        }

        let body: GenerateFieldsResponse =
            response.json().await.map_err(|_| SuggestError::Malformed)?;

        if !body.success {
            return Err(SuggestError::Rejected);
        }
        let data = body.data.ok_or(SuggestError::Malformed)?;

        Ok(data.fields.into_iter().map(map_descriptor).collect())
    }
}

fn map_descriptor(d: GeneratedDescriptor) -> SuggestedField {
    SuggestedField {
        display_name: d.display_name,
        description: d.description,
        // The endpoint spells plain strings "text"; "array" keeps its own
        // type rather than being narrowed to string.
        field_type: FieldType::from_api(d.field_type.as_deref().unwrap_or("string")),
    }
}

/// Result of a spawned suggestion request, delivered to the event loop.
#[derive(Debug)]
pub enum SuggestOutcome {
    Fields(Vec<SuggestedField>),
    Failed(String),
}

/// Run the request on a background task, sending the outcome over `tx`.
///
/// The returned handle lets the app abort the task on shutdown so no
/// resolution outlives the wizard. A dropped receiver is not an error.
pub fn spawn_generate(
    client: SuggestionClient,
    prompt: String,
    tx: UnboundedSender<SuggestOutcome>,
) -> AbortHandle {
    let task = tokio::spawn(async move {
        let outcome = match client.generate_fields(&prompt).await {
            Ok(fields) => {
                debug!("Suggestion endpoint returned {} fields", fields.len());
                SuggestOutcome::Fields(fields)
            }
            Err(e) => {
                warn!("Field generation failed: {}", e);
                SuggestOutcome::Failed(format!("Field generation failed: {}. Try again.", e))
            }
        };
        let _ = tx.send(outcome);
    });
    task.abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_type_maps_to_string() {
        let suggested = map_descriptor(GeneratedDescriptor {
            display_name: "CEO Name".to_string(),
            description: "Chief executive's full name".to_string(),
            field_type: Some("text".to_string()),
        });
        assert_eq!(suggested.field_type, FieldType::String);
        assert_eq!(suggested.display_name, "CEO Name");
    }

    #[test]
    fn test_array_type_is_preserved() {
        let suggested = map_descriptor(GeneratedDescriptor {
            display_name: "Office Locations".to_string(),
            description: String::new(),
            field_type: Some("array".to_string()),
        });
        assert_eq!(suggested.field_type, FieldType::Array);
    }

    #[test]
    fn test_missing_type_defaults_to_string() {
        let suggested = map_descriptor(GeneratedDescriptor {
            display_name: "Anything".to_string(),
            description: String::new(),
            field_type: None,
        });
        assert_eq!(suggested.field_type, FieldType::String);
    }

    #[test]
    fn test_response_shape_parses() {
        let raw = r#"{"success":true,"data":{"fields":[
            {"displayName":"CEO Name","description":"...","type":"text"}
        ]}}"#;
        let parsed: GenerateFieldsResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.data.unwrap().fields.len(), 1);
    }

    #[test]
    fn test_unsuccessful_response_parses_without_data() {
        let raw = r#"{"success":false}"#;
        let parsed: GenerateFieldsResponse = serde_json::from_str(raw).unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_none());
    }
}
