// ABOUTME: Enrichment field model: typed field descriptors, the preset
// catalog, and the capped selected-field collection

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap on the number of fields a single job may request.
pub const MAX_FIELDS: usize = 10;

/// Value type an enrichment field resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
}

impl FieldType {
    /// Parse the type spelling used by the suggestion endpoint.
    ///
    /// The endpoint reports `"text"` for plain strings; unknown spellings
    /// fall back to `String` rather than failing the whole suggestion.
    pub fn from_api(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            _ => Self::String,
        }
    }

    /// Display label for the manual-entry type selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }

    /// Next type in the manual-entry selector cycle.
    pub fn cycle(&self) -> Self {
        match self {
            Self::String => Self::Number,
            Self::Number => Self::Boolean,
            Self::Boolean => Self::Array,
            Self::Array => Self::String,
        }
    }
}

/// A named, typed attribute the enrichment engine will derive per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentField {
    /// Unique machine identifier within a job.
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub field_type: FieldType,
    pub required: bool,
}

/// Why an add was rejected by the selected-field set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldSetError {
    #[error("maximum of {MAX_FIELDS} fields per job reached")]
    CapacityReached,
    #[error("a field named '{0}' is already selected")]
    DuplicateName(String),
}

/// The selected-fields collection.
///
/// All three acquisition paths (preset toggle, manual entry, suggestion
/// accept) funnel through [`FieldSet::add`], which is the single place the
/// cap and the name-uniqueness invariant are enforced.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: Vec<EnrichmentField>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, rejecting duplicates by machine name and enforcing the
    /// cap. On rejection the set is left unchanged.
    pub fn add(&mut self, field: EnrichmentField) -> Result<(), FieldSetError> {
        if self.fields.len() >= MAX_FIELDS {
            return Err(FieldSetError::CapacityReached);
        }
        if self.contains(&field.name) {
            return Err(FieldSetError::DuplicateName(field.name));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Remove a field by machine name. Returns the removed field, if any.
    pub fn remove(&mut self, name: &str) -> Option<EnrichmentField> {
        let pos = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(pos))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Whether a display name is already represented (used to mark preset
    /// catalog entries as selected).
    pub fn contains_display_name(&self, display_name: &str) -> bool {
        self.fields.iter().any(|f| f.display_name == display_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.fields.len() >= MAX_FIELDS
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[EnrichmentField] {
        &self.fields
    }

    /// Existing machine names, for unique-name generation.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn into_fields(self) -> Vec<EnrichmentField> {
        self.fields
    }
}

/// Derive a machine identifier from a display name that is guaranteed not
/// to collide with any name in `existing`.
///
/// Slugifies to snake_case, then suffixes `_2`, `_3`, … until unique.
pub fn unique_field_name<'a, I>(display_name: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = existing.into_iter().collect();

    let mut slug = String::new();
    let mut last_underscore = true;
    for c in display_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_underscore = false;
        } else if !last_underscore {
            slug.push('_');
            last_underscore = true;
        }
    }
    let slug = slug.trim_matches('_').to_string();
    let base = if slug.is_empty() { "field".to_string() } else { slug };

    if !taken.contains(&base.as_str()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

/// A preset field template from the built-in catalog.
#[derive(Debug, Clone, Copy)]
pub struct PresetField {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub field_type: FieldType,
}

impl PresetField {
    pub fn to_field(&self) -> EnrichmentField {
        EnrichmentField {
            name: self.name.to_string(),
            display_name: self.display_name.to_string(),
            description: self.description.to_string(),
            field_type: self.field_type,
            required: false,
        }
    }
}

/// The eight built-in field templates.
pub const PRESET_FIELDS: [PresetField; 8] = [
    PresetField {
        name: "company_name",
        display_name: "Company Name",
        description: "Legal or trading name of the company",
        field_type: FieldType::String,
    },
    PresetField {
        name: "company_description",
        display_name: "Description",
        description: "One-paragraph summary of what the company does",
        field_type: FieldType::String,
    },
    PresetField {
        name: "industry",
        display_name: "Industry",
        description: "Primary industry or sector",
        field_type: FieldType::String,
    },
    PresetField {
        name: "employee_count",
        display_name: "Employee Count",
        description: "Approximate number of employees",
        field_type: FieldType::Number,
    },
    PresetField {
        name: "year_founded",
        display_name: "Year Founded",
        description: "Year the company was founded",
        field_type: FieldType::Number,
    },
    PresetField {
        name: "headquarters",
        display_name: "Headquarters",
        description: "City and country of the main office",
        field_type: FieldType::String,
    },
    PresetField {
        name: "funding_raised",
        display_name: "Funding Raised",
        description: "Total disclosed funding raised to date",
        field_type: FieldType::String,
    },
    PresetField {
        name: "funding_stage",
        display_name: "Funding Stage",
        description: "Latest funding stage (seed, series A, ...)",
        field_type: FieldType::String,
    },
];
