//! In-memory record working sets and catalogue listings.

use crate::record::{FieldValue, Record};
use crate::schema::{FieldDefinition, FieldType, ModuleSchema};
use crate::service::format::{grouped_number, short_date, yes_no};
use crate::service::sample::SampleDataGenerator;
use serde::Serialize;
use uuid::Uuid;

const SUMMARY_FIELDS: usize = 4;
const SUMMARY_RELATIONS: usize = 2;

/// Records of one module, seeded from sample data. Never persisted.
#[derive(Clone, Debug, Default)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn seeded(schema: &ModuleSchema) -> Self {
        Self::from_records(SampleDataGenerator::generate(schema))
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Append under a fresh id; returns the stored record.
    pub fn add(&mut self, mut record: Record) -> &Record {
        record.id = Uuid::new_v4().to_string();
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Swap the values of record `id`, keeping the id. None when absent.
    pub fn replace(&mut self, id: &str, mut record: Record) -> Option<&Record> {
        let slot = self.records.iter_mut().find(|r| r.id == id)?;
        record.id = slot.id.clone();
        *slot = record;
        Some(slot)
    }

    pub fn remove(&mut self, id: &str) -> Option<Record> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }

    /// Case-insensitive substring match over the id and every value. Blank terms match all.
    pub fn search(&self, term: &str) -> Vec<&Record> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|r| {
                r.id.to_lowercase().contains(&needle)
                    || r.values
                        .values()
                        .any(|v| v.raw_string().to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// Table cell text for list views.
pub fn format_cell(field: &FieldDefinition, value: Option<&FieldValue>) -> String {
    match (field.field_type, value) {
        (FieldType::Boolean, v) => yes_no(v.map(FieldValue::is_truthy).unwrap_or(false)).to_string(),
        (FieldType::Date, Some(FieldValue::Date(d))) => short_date(*d),
        (FieldType::Number, Some(FieldValue::Number(n))) => grouped_number(*n),
        (_, Some(v)) if v.is_truthy() => v.raw_string(),
        _ => "-".to_string(),
    }
}

/// Catalogue card for a module.
#[derive(Clone, Debug, Serialize)]
pub struct ModuleSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub table_name: String,
    pub fields: Vec<String>,
    pub more_fields: usize,
    pub relations: Vec<String>,
    pub more_relations: usize,
    pub status: &'static str,
    pub created: String,
}

impl ModuleSummary {
    pub fn from_schema(schema: &ModuleSchema) -> Self {
        Self {
            id: schema.id.clone(),
            name: schema.name.clone(),
            description: schema.description.clone(),
            table_name: schema.table_name.clone(),
            fields: schema
                .fields
                .iter()
                .take(SUMMARY_FIELDS)
                .map(|f| f.name.clone())
                .collect(),
            more_fields: schema.fields.len().saturating_sub(SUMMARY_FIELDS),
            relations: schema
                .relations
                .iter()
                .take(SUMMARY_RELATIONS)
                .map(|r| r.name.clone())
                .collect(),
            more_relations: schema.relations.len().saturating_sub(SUMMARY_RELATIONS),
            status: schema.status.label(),
            created: short_date(schema.created_at.date_naive()),
        }
    }
}
