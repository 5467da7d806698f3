//! Schema-driven services: sample data, forms, detail views and record sets.

pub mod detail;
pub mod form;
pub mod format;
pub mod records;
pub mod sample;
pub mod validation;

pub use detail::{DetailField, DetailRenderer, DetailView, ModuleInfo, RelationSummary};
pub use form::{Choice, Editor, FieldEditor, FormMode, GenericForm, SubmitOutcome};
pub use records::{format_cell, ModuleSummary, RecordSet};
pub use sample::{SampleDataGenerator, SAMPLE_SIZE};
pub use validation::{default_value, FormValidator};
