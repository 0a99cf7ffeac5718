// ABOUTME: Core data models for enrichment fields, dataset rows, and job configuration

pub mod field;
pub mod job;

pub use field::{
    unique_field_name, EnrichmentField, FieldSet, FieldSetError, FieldType, PresetField,
    MAX_FIELDS, PRESET_FIELDS,
};
pub use job::{EnrichmentJob, Row};
