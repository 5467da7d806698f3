//! Synthetic records shaped by a module schema.
//!
//! Numbers and booleans are random on every call; relation values are placeholders
//! (`rel_<n>`) that do not point at records of the target module.

use crate::record::{FieldValue, Record};
use crate::schema::{FieldDefinition, FieldType, ModuleSchema};
use crate::store::SchemaStore;
use chrono::{NaiveDate, Utc};
use rand::Rng;

pub const SAMPLE_SIZE: usize = 5;

/// Used when a select field has no options.
const FALLBACK_OPTION: &str = "Opción 1";

pub struct SampleDataGenerator;

impl SampleDataGenerator {
    pub fn generate(schema: &ModuleSchema) -> Vec<Record> {
        Self::generate_with_rng(schema, &mut rand::thread_rng())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(schema: &ModuleSchema, rng: &mut R) -> Vec<Record> {
        let today = Utc::now().date_naive();
        (1..=SAMPLE_SIZE)
            .map(|i| {
                let mut record = Record::new(i.to_string());
                for field in &schema.fields {
                    record.set(&field.name, sample_value(field, i, today, rng));
                }
                record
            })
            .collect()
    }

    /// Sample batch for a stored module; empty when the module is unknown.
    pub fn generate_for_module(store: &SchemaStore, module_id: &str) -> Vec<Record> {
        store
            .get_module(module_id)
            .map(Self::generate)
            .unwrap_or_default()
    }
}

fn sample_value<R: Rng + ?Sized>(field: &FieldDefinition, index: usize, today: NaiveDate, rng: &mut R) -> FieldValue {
    match field.field_type {
        FieldType::Text => FieldValue::Text(format!("{} {}", field.name, index)),
        FieldType::Number => FieldValue::Number(f64::from(rng.gen_range(1..=1000u32))),
        FieldType::Email => FieldValue::Text(format!("usuario{}@email.com", index)),
        FieldType::Date => FieldValue::Date(today),
        FieldType::Boolean => FieldValue::Bool(rng.gen_bool(0.5)),
        FieldType::Select => FieldValue::text(
            field
                .options()
                .first()
                .map(String::as_str)
                .unwrap_or(FALLBACK_OPTION),
        ),
        FieldType::Textarea => FieldValue::Text(format!("Descripción detallada para {} {}", field.name, index)),
        FieldType::Relation => FieldValue::Text(format!("rel_{}", index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStorage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn schema_with_every_type() -> ModuleSchema {
        let now = Utc::now();
        ModuleSchema {
            id: "all".into(),
            name: "Todo".into(),
            description: String::new(),
            table_name: "todo".into(),
            fields: vec![
                FieldDefinition::new("1", "title", FieldType::Text),
                FieldDefinition::new("2", "qty", FieldType::Number),
                FieldDefinition::new("3", "mail", FieldType::Email),
                FieldDefinition::new("4", "due", FieldType::Date),
                FieldDefinition::new("5", "done", FieldType::Boolean),
                FieldDefinition::new("6", "kind", FieldType::Select).with_options(["B", "A"]),
                FieldDefinition::new("7", "notes", FieldType::Textarea),
                FieldDefinition::new("8", "owner", FieldType::Relation).relation("customers"),
            ],
            relations: Vec::new(),
            created_at: now,
            updated_at: now,
            status: Default::default(),
        }
    }

    #[test]
    fn five_records_with_exactly_the_schema_fields() {
        let schema = schema_with_every_type();
        let records = SampleDataGenerator::generate(&schema);
        assert_eq!(records.len(), SAMPLE_SIZE);
        let expected: HashSet<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, (i + 1).to_string());
            let keys: HashSet<&str> = record.values.keys().map(String::as_str).collect();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn values_follow_field_types() {
        let schema = schema_with_every_type();
        let mut rng = StdRng::seed_from_u64(7);
        let records = SampleDataGenerator::generate_with_rng(&schema, &mut rng);
        let today = Utc::now().date_naive();
        let third = &records[2];
        assert_eq!(third.get("title"), Some(&FieldValue::text("title 3")));
        assert_eq!(third.get("mail"), Some(&FieldValue::text("usuario3@email.com")));
        assert_eq!(third.get("kind"), Some(&FieldValue::text("B")));
        assert_eq!(third.get("notes"), Some(&FieldValue::text("Descripción detallada para notes 3")));
        assert_eq!(third.get("owner"), Some(&FieldValue::text("rel_3")));
        for record in &records {
            match record.get("qty") {
                Some(FieldValue::Number(n)) => assert!((1.0..=1000.0).contains(n) && n.fract() == 0.0),
                other => panic!("unexpected qty {:?}", other),
            }
            assert!(matches!(record.get("done"), Some(FieldValue::Bool(_))));
            assert_eq!(record.get("due"), Some(&FieldValue::Date(today)));
        }
    }

    #[test]
    fn select_without_options_falls_back() {
        let mut schema = schema_with_every_type();
        schema.fields[5].options = None;
        let records = SampleDataGenerator::generate(&schema);
        assert_eq!(records[0].get("kind"), Some(&FieldValue::text("Opción 1")));
    }

    #[test]
    fn unknown_module_yields_nothing() {
        let store = SchemaStore::open(Arc::new(MemoryStorage::new()));
        assert!(SampleDataGenerator::generate_for_module(&store, "ghost").is_empty());
        assert_eq!(SampleDataGenerator::generate_for_module(&store, "products").len(), 5);
    }
}
