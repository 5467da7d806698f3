//! Generic schema-driven form: initial values, editor descriptions, input handling and submit.

use crate::error::FormError;
use crate::record::{FieldValue, Record};
use crate::schema::{FieldDefinition, FieldType, ModuleSchema};
use crate::service::format::yes_no;
use crate::service::sample::SampleDataGenerator;
use crate::service::validation::{default_value, FormValidator};
use crate::store::SchemaStore;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Fields shown in the live preview.
const PREVIEW_FIELDS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// Editor widget for a field type.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "editor", rename_all = "snake_case")]
pub enum Editor {
    TextInput { email: bool },
    NumberInput,
    DatePicker,
    Checkbox,
    TextArea { rows: u8 },
    Select { choices: Vec<Choice> },
    RelationPicker {
        module_id: String,
        module_name: Option<String>,
        choices: Vec<Choice>,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct FieldEditor {
    pub name: String,
    pub required: bool,
    pub value: FieldValue,
    pub placeholder: String,
    #[serde(flatten)]
    pub editor: Editor,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub mode: FormMode,
    pub message: String,
}

pub struct GenericForm {
    schema: ModuleSchema,
    record_id: Option<String>,
    values: HashMap<String, FieldValue>,
}

impl GenericForm {
    /// Form over `schema`, editing `existing` when given. Falsy existing values fall back to the type default.
    pub fn new(schema: &ModuleSchema, existing: Option<&Record>) -> Self {
        Self::with_today(schema, existing, Utc::now().date_naive())
    }

    pub fn with_today(schema: &ModuleSchema, existing: Option<&Record>, today: NaiveDate) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|f| {
                let value = existing
                    .and_then(|r| r.get(&f.name))
                    .filter(|v| v.is_truthy())
                    .cloned()
                    .unwrap_or_else(|| default_value(f.field_type, today));
                (f.name.clone(), value)
            })
            .collect();
        Self {
            schema: schema.clone(),
            record_id: existing.map(|r| r.id.clone()),
            values,
        }
    }

    pub fn mode(&self) -> FormMode {
        if self.record_id.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn title(&self) -> String {
        match self.mode() {
            FormMode::Create => format!("Nuevo {}", self.schema.name),
            FormMode::Edit => format!("Editar {}", self.schema.name),
        }
    }

    pub fn editors(&self, store: &SchemaStore) -> Vec<FieldEditor> {
        self.schema
            .fields
            .iter()
            .map(|f| FieldEditor {
                name: f.name.clone(),
                required: f.required,
                value: self.values.get(&f.name).cloned().unwrap_or(FieldValue::Null),
                placeholder: placeholder(f),
                editor: editor_for(f, store),
            })
            .collect()
    }

    /// Apply raw editor input to a field.
    pub fn set_input(&mut self, field_name: &str, raw: &str, store: &SchemaStore) -> Result<(), FormError> {
        let field = self.field(field_name)?;
        let value = FormValidator::coerce_input(field, raw)?;
        self.accept(field_name, value, store)
    }

    /// Apply a JSON value (HTTP body) to a field.
    pub fn set_json(&mut self, field_name: &str, raw: &serde_json::Value, store: &SchemaStore) -> Result<(), FormError> {
        let field = self.field(field_name)?;
        let value = FormValidator::coerce_json(field, raw)?;
        self.accept(field_name, value, store)
    }

    fn field(&self, name: &str) -> Result<&FieldDefinition, FormError> {
        self.schema
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    fn accept(&mut self, field_name: &str, value: FieldValue, store: &SchemaStore) -> Result<(), FormError> {
        let field = self.field(field_name)?;
        let allowed: Option<Vec<String>> = match field.field_type {
            FieldType::Select => Some(field.options().to_vec()),
            FieldType::Relation => Some(relation_choices(field, store).into_iter().map(|c| c.value).collect()),
            _ => None,
        };
        if let (Some(allowed), Some(chosen)) = (allowed, value.as_str()) {
            if !allowed.iter().any(|a| a == chosen) {
                return Err(FormError::InvalidValue {
                    field: field_name.to_string(),
                    reason: format!("'{}' no es una opción válida", chosen),
                });
            }
        }
        self.values.insert(field_name.to_string(), value);
        Ok(())
    }

    /// Reject with the missing required fields, or hand the full record to `on_complete`.
    /// New records carry an empty id; the record set assigns one.
    pub fn submit<F>(&self, on_complete: F) -> Result<SubmitOutcome, FormError>
    where
        F: FnOnce(Record),
    {
        let missing = FormValidator::missing_required(&self.schema.fields, &self.values);
        if !missing.is_empty() {
            tracing::debug!(module_id = %self.schema.id, missing = ?missing, "form rejected");
            return Err(FormError::MissingRequired(missing));
        }
        let record = Record {
            id: self.record_id.clone().unwrap_or_default(),
            values: self.values.clone(),
        };
        on_complete(record);
        let mode = self.mode();
        let message = match mode {
            FormMode::Create => "Registro creado: el registro ha sido creado exitosamente",
            FormMode::Edit => "Registro actualizado: el registro ha sido actualizado exitosamente",
        };
        Ok(SubmitOutcome {
            mode,
            message: message.to_string(),
        })
    }

    /// First fields as (name, text) pairs for the live preview.
    pub fn preview(&self) -> Vec<(String, String)> {
        self.schema
            .fields
            .iter()
            .take(PREVIEW_FIELDS)
            .map(|f| {
                let value = self.values.get(&f.name);
                let text = match (f.field_type, value) {
                    (FieldType::Boolean, v) => yes_no(v.map(FieldValue::is_truthy).unwrap_or(false)).to_string(),
                    (_, Some(v)) if v.is_truthy() => v.raw_string(),
                    _ => "-".to_string(),
                };
                (f.name.clone(), text)
            })
            .collect()
    }
}

fn placeholder(field: &FieldDefinition) -> String {
    match field.field_type {
        FieldType::Select | FieldType::Relation => format!("Selecciona {}", field.name),
        _ => format!("Ingresa {}", field.name),
    }
}

pub fn editor_for(field: &FieldDefinition, store: &SchemaStore) -> Editor {
    match field.field_type {
        FieldType::Text => Editor::TextInput { email: false },
        FieldType::Email => Editor::TextInput { email: true },
        FieldType::Number => Editor::NumberInput,
        FieldType::Date => Editor::DatePicker,
        FieldType::Boolean => Editor::Checkbox,
        FieldType::Textarea => Editor::TextArea { rows: 3 },
        FieldType::Select => Editor::Select {
            choices: field
                .options()
                .iter()
                .map(|o| Choice {
                    value: o.clone(),
                    label: o.clone(),
                })
                .collect(),
        },
        FieldType::Relation => {
            let module_id = field.relation_to.clone().unwrap_or_default();
            Editor::RelationPicker {
                module_name: store.get_module(&module_id).map(|m| m.name.clone()),
                choices: relation_choices(field, store),
                module_id,
            }
        }
    }
}

/// Choices for a relation field: the referenced module's sample records, labelled by `name` or id.
pub fn relation_choices(field: &FieldDefinition, store: &SchemaStore) -> Vec<Choice> {
    let Some(target) = field.relation_to.as_deref() else {
        return Vec::new();
    };
    SampleDataGenerator::generate_for_module(store, target)
        .into_iter()
        .map(|r| {
            let label = r
                .get("name")
                .filter(|v| v.is_truthy())
                .map(FieldValue::raw_string)
                .unwrap_or_else(|| r.id.clone());
            Choice { value: r.id, label }
        })
        .collect()
}
