//! Module creation workflow: the builder's draft, table-name derivation and schema assembly.

use crate::error::SchemaError;
use crate::schema::{validate_draft, FieldDefinition, FieldType, ModuleSchema, ModuleStatus, RelationDefinition, MIN_FIELDS};
use crate::store::SchemaStore;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

fn table_name_patterns() -> &'static (Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (
            Regex::new(r"[^a-z0-9\s]").expect("static pattern"),
            Regex::new(r"\s+").expect("static pattern"),
        )
    })
}

/// Lowercase, drop everything outside `[a-z0-9\s]`, then turn whitespace runs into `_`.
/// e.g. "Mi Módulo #1" -> "mi_mdulo_1"
pub fn derive_table_name(module_name: &str) -> String {
    let (strip, spaces) = table_name_patterns();
    let lower = module_name.to_lowercase();
    let stripped = strip.replace_all(&lower, "");
    spaces.replace_all(&stripped, "_").into_owned()
}

fn default_draft_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("1", "id", FieldType::Number).required(),
        FieldDefinition::new("2", "name", FieldType::Text).required(),
    ]
}

/// Builder state for a new module. `table_name` is derived from `name` unless given.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default = "default_draft_fields")]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub relations: Vec<RelationDefinition>,
    #[serde(default)]
    pub status: ModuleStatus,
}

impl Default for ModuleDraft {
    fn default() -> Self {
        Self::new("")
    }
}

impl ModuleDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            table_name: None,
            fields: default_draft_fields(),
            relations: Vec::new(),
            status: ModuleStatus::Active,
        }
    }

    pub fn table_name(&self) -> String {
        match self.table_name.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => derive_table_name(self.name.trim()),
        }
    }

    /// Appends a field with the next free numeric id.
    pub fn add_field(&mut self, name: impl Into<String>, field_type: FieldType) -> &mut FieldDefinition {
        let next_id = self
            .fields
            .iter()
            .filter_map(|f| f.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        self.fields
            .push(FieldDefinition::new(next_id.to_string(), name, field_type));
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    pub fn remove_field(&mut self, field_id: &str) -> Result<(), SchemaError> {
        if self.fields.len() <= MIN_FIELDS {
            return Err(SchemaError::Validation(vec![format!(
                "Debe mantener al menos {} campos",
                MIN_FIELDS
            )]));
        }
        self.fields.retain(|f| f.id != field_id);
        Ok(())
    }

    pub fn validate(&self, store: &SchemaStore) -> Result<(), SchemaError> {
        validate_draft(self, |id| store.contains_module(id))
    }

    /// Assemble the schema. Only relations with a name and a target are kept, re-anchored on `id`.
    /// Kept relations without an id get a fresh `rel_<uuid>`.
    pub fn build(&self, id: &str, now: DateTime<Utc>) -> ModuleSchema {
        let fields = self
            .fields
            .iter()
            .map(|f| FieldDefinition {
                name: f.name.trim().to_string(),
                ..f.clone()
            })
            .collect();
        let relations = self
            .relations
            .iter()
            .filter(|r| !r.name.is_empty() && !r.to_module.is_empty())
            .map(|r| RelationDefinition {
                id: if r.id.trim().is_empty() {
                    format!("rel_{}", Uuid::new_v4().simple())
                } else {
                    r.id.clone()
                },
                from_module: id.to_string(),
                ..r.clone()
            })
            .collect();
        ModuleSchema {
            id: id.to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            table_name: self.table_name(),
            fields,
            relations,
            created_at: now,
            updated_at: now,
            status: self.status,
        }
    }

    /// Validate, then register the module and its relations. The store is untouched on failure.
    pub fn create(&self, store: &mut SchemaStore) -> Result<ModuleSchema, SchemaError> {
        store.init();
        self.validate(store)?;
        let now = Utc::now();
        let id = next_module_id(store, now);
        let schema = self.build(&id, now);
        store.add_module(schema.clone());
        for relation in &schema.relations {
            store.add_relation(relation.clone());
        }
        tracing::info!(module_id = %id, name = %schema.name, fields = schema.fields.len(), "module created");
        Ok(schema)
    }
}

/// `module_<millis>`, bumped until free so quick successive creations do not overwrite each other.
pub fn next_module_id(store: &SchemaStore, now: DateTime<Utc>) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let id = format!("module_{}", millis);
        if !store.contains_module(&id) {
            return id;
        }
        millis += 1;
    }
}
