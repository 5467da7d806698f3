//! Module definition validation: names, field uniqueness, select options and relation targets.
//! All problems are collected so the builder can show them together.

use crate::error::SchemaError;
use crate::schema::{FieldDefinition, FieldType, ModuleDraft, ModuleSchema};
use std::collections::HashSet;

pub const MIN_FIELDS: usize = 2;

pub fn validate_draft(draft: &ModuleDraft, known_module: impl Fn(&str) -> bool) -> Result<(), SchemaError> {
    validate_parts(&draft.name, &draft.table_name(), &draft.fields, known_module)
}

/// Same rules as [`validate_draft`], applied to a full schema submitted for update.
pub fn validate_schema(schema: &ModuleSchema, known_module: impl Fn(&str) -> bool) -> Result<(), SchemaError> {
    validate_parts(&schema.name, &schema.table_name, &schema.fields, known_module)
}

fn validate_parts(
    name: &str,
    table_name: &str,
    fields: &[FieldDefinition],
    known_module: impl Fn(&str) -> bool,
) -> Result<(), SchemaError> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push("El nombre del módulo es requerido".to_string());
    }
    if table_name.trim().is_empty() {
        errors.push("El nombre de la tabla es requerido".to_string());
    }
    if fields.len() < MIN_FIELDS {
        errors.push(format!("Debe tener al menos {} campos", MIN_FIELDS));
    }

    let duplicates = duplicate_field_names(fields);
    if !duplicates.is_empty() {
        errors.push(format!("Nombres de campos duplicados: {}", duplicates.join(", ")));
    }

    if fields.iter().any(|f| f.name.trim().is_empty()) {
        errors.push("Todos los campos deben tener un nombre".to_string());
    }

    if fields
        .iter()
        .any(|f| f.field_type == FieldType::Select && f.options().is_empty())
    {
        errors.push("Los campos de selección deben tener opciones definidas".to_string());
    }

    let mut missing_target = false;
    for f in fields.iter().filter(|f| f.field_type == FieldType::Relation) {
        match f.relation_to.as_deref().filter(|t| !t.is_empty()) {
            None => missing_target = true,
            Some(target) if !known_module(target) => {
                errors.push(format!("Módulo relacionado no encontrado: {}", target));
            }
            Some(_) => {}
        }
    }
    if missing_target {
        errors.push("Los campos de relación deben especificar el módulo relacionado".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Validation(errors))
    }
}

/// Field names (trimmed, case-insensitive) that occur more than once, in order of first repeat.
fn duplicate_field_names(fields: &[FieldDefinition]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for f in fields {
        let key = f.name.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if !seen.insert(key.clone()) && reported.insert(key.clone()) {
            out.push(key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with(fields: Vec<FieldDefinition>) -> ModuleDraft {
        ModuleDraft {
            fields,
            ..ModuleDraft::new("Pedidos")
        }
    }

    fn errors_of(result: Result<(), SchemaError>) -> Vec<String> {
        match result {
            Err(SchemaError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn default_draft_is_valid() {
        assert!(validate_draft(&ModuleDraft::new("Pedidos"), |_| false).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let draft = ModuleDraft {
            fields: vec![FieldDefinition::new("1", "", FieldType::Select)],
            ..ModuleDraft::new("")
        };
        let errors = errors_of(validate_draft(&draft, |_| true));
        assert_eq!(
            errors,
            vec![
                "El nombre del módulo es requerido",
                "El nombre de la tabla es requerido",
                "Debe tener al menos 2 campos",
                "Todos los campos deben tener un nombre",
                "Los campos de selección deben tener opciones definidas",
            ]
        );
    }

    #[test]
    fn built_schema_is_checked_like_its_draft() {
        let draft = draft_with(vec![
            FieldDefinition::new("1", "id", FieldType::Number),
            FieldDefinition::new("2", " id", FieldType::Text),
        ]);
        let schema = draft.build("module_1", chrono::Utc::now());
        let errors = errors_of(validate_schema(&schema, |_| true));
        assert_eq!(errors, vec!["Nombres de campos duplicados: id"]);
        assert!(validate_schema(&ModuleDraft::new("Pedidos").build("module_2", chrono::Utc::now()), |_| false).is_ok());
    }

    #[test]
    fn duplicate_names_are_case_insensitive() {
        let draft = draft_with(vec![
            FieldDefinition::new("1", "Name", FieldType::Text),
            FieldDefinition::new("2", "name ", FieldType::Text),
            FieldDefinition::new("3", "NAME", FieldType::Text),
        ]);
        let errors = errors_of(validate_draft(&draft, |_| true));
        assert_eq!(errors, vec!["Nombres de campos duplicados: name"]);
    }

    #[test]
    fn relation_needs_existing_target() {
        let draft = draft_with(vec![
            FieldDefinition::new("1", "id", FieldType::Number),
            FieldDefinition::new("2", "cliente", FieldType::Relation).relation("ghost"),
            FieldDefinition::new("3", "producto", FieldType::Relation),
        ]);
        let errors = errors_of(validate_draft(&draft, |id| id == "customers"));
        assert_eq!(
            errors,
            vec![
                "Módulo relacionado no encontrado: ghost",
                "Los campos de relación deben especificar el módulo relacionado",
            ]
        );

        let ok = draft_with(vec![
            FieldDefinition::new("1", "id", FieldType::Number),
            FieldDefinition::new("2", "cliente", FieldType::Relation).relation("customers"),
        ]);
        assert!(validate_draft(&ok, |id| id == "customers").is_ok());
    }
}
