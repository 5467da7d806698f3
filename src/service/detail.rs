//! Read-only record view.

use crate::record::{FieldValue, Record};
use crate::schema::{FieldDefinition, FieldType, ModuleSchema, RelationDefinition};
use crate::service::format::{grouped_number, long_date, yes_no};
use crate::store::SchemaStore;
use serde::Serialize;

/// Label for a relation whose target module is gone.
const RELATION_FALLBACK: &str = "Relación";
const EMPTY: &str = "-";

#[derive(Clone, Debug, Serialize)]
pub struct DetailField {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub display: String,
    pub type_note: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RelationSummary {
    pub name: String,
    pub to_module: String,
    pub summary: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModuleInfo {
    pub name: String,
    pub table_name: String,
    pub field_count: usize,
    pub relation_count: usize,
    pub status: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct DetailView {
    pub title: String,
    pub record_id: String,
    pub fields: Vec<DetailField>,
    pub relations: Vec<RelationSummary>,
    pub module: ModuleInfo,
}

pub struct DetailRenderer;

impl DetailRenderer {
    /// Display string of one field value.
    pub fn format_value(field: &FieldDefinition, value: Option<&FieldValue>, store: &SchemaStore) -> String {
        let present = value.filter(|v| !matches!(v, FieldValue::Null));
        match (field.field_type, present) {
            (FieldType::Boolean, v) => yes_no(v.map(FieldValue::is_truthy).unwrap_or(false)).to_string(),
            (_, None) => EMPTY.to_string(),
            (FieldType::Date, Some(FieldValue::Date(d))) => long_date(*d),
            (FieldType::Number, Some(FieldValue::Number(n))) => grouped_number(*n),
            (FieldType::Number, Some(other)) | (FieldType::Date, Some(other)) => other.raw_string(),
            (FieldType::Relation, Some(v)) if field.relation_to.is_some() => {
                let label = field
                    .relation_to
                    .as_deref()
                    .and_then(|id| store.get_module(id))
                    .map(|m| m.name.as_str())
                    .unwrap_or(RELATION_FALLBACK);
                format!("{}: {}", label, v.raw_string())
            }
            (_, Some(v)) if v.is_truthy() => v.raw_string(),
            _ => EMPTY.to_string(),
        }
    }

    pub fn render(schema: &ModuleSchema, record: &Record, store: &SchemaStore) -> DetailView {
        let title = record
            .get("name")
            .filter(|v| v.is_truthy())
            .map(FieldValue::raw_string)
            .unwrap_or_else(|| format!("{} #{}", schema.name, record.id));

        let fields = schema
            .fields
            .iter()
            .map(|f| DetailField {
                name: f.name.clone(),
                field_type: f.field_type,
                required: f.required,
                display: Self::format_value(f, record.get(&f.name), store),
                type_note: type_note(f, store),
            })
            .collect();

        let relations = schema
            .relations
            .iter()
            .map(|r| RelationSummary {
                name: r.name.clone(),
                to_module: r.to_module.clone(),
                summary: relation_summary(r, store),
            })
            .collect();

        DetailView {
            title,
            record_id: record.id.clone(),
            fields,
            relations,
            module: ModuleInfo {
                name: schema.name.clone(),
                table_name: schema.table_name.clone(),
                field_count: schema.fields.len(),
                relation_count: schema.relations.len(),
                status: schema.status.label(),
            },
        }
    }
}

fn target_name<'a>(module_id: &str, store: &'a SchemaStore) -> &'a str {
    store
        .get_module(module_id)
        .map(|m| m.name.as_str())
        .unwrap_or("no encontrado")
}

fn type_note(field: &FieldDefinition, store: &SchemaStore) -> String {
    match field.relation_to.as_deref() {
        Some(target) => format!("Tipo: {} → {}", field.field_type.as_str(), target_name(target, store)),
        None => format!("Tipo: {}", field.field_type.as_str()),
    }
}

fn relation_summary(relation: &RelationDefinition, store: &SchemaStore) -> String {
    match relation.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => description.to_string(),
        None => format!(
            "Relación {} con {}",
            relation.relation_type.as_str(),
            target_name(&relation.to_module, store)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStorage;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn store() -> SchemaStore {
        SchemaStore::open(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn booleans_render_si_no() {
        let store = store();
        let field = FieldDefinition::new("1", "active", FieldType::Boolean);
        let yes = Record::new("1").with("active", true);
        let no = Record::new("2").with("active", false);
        assert_eq!(DetailRenderer::format_value(&field, yes.get("active"), &store), "Sí");
        assert_eq!(DetailRenderer::format_value(&field, no.get("active"), &store), "No");
        assert_eq!(DetailRenderer::format_value(&field, None, &store), "No");
    }

    #[test]
    fn dates_and_numbers_use_spanish_formats() {
        let store = store();
        let date = FieldDefinition::new("1", "since", FieldType::Date);
        let d = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(DetailRenderer::format_value(&date, Some(&d), &store), "15 de enero de 2024");
        assert_eq!(DetailRenderer::format_value(&date, Some(&FieldValue::Null), &store), "-");

        let number = FieldDefinition::new("2", "price", FieldType::Number);
        let n = FieldValue::Number(12345.0);
        assert_eq!(DetailRenderer::format_value(&number, Some(&n), &store), "12.345");
        assert_eq!(DetailRenderer::format_value(&number, Some(&FieldValue::Number(0.0)), &store), "0");
        assert_eq!(DetailRenderer::format_value(&number, None, &store), "-");
    }

    #[test]
    fn relations_name_their_module() {
        let store = store();
        let known = FieldDefinition::new("1", "customer", FieldType::Relation).relation("customers");
        let gone = FieldDefinition::new("2", "owner", FieldType::Relation).relation("ghost");
        let value = FieldValue::text("rel_2");
        assert_eq!(DetailRenderer::format_value(&known, Some(&value), &store), "Clientes: rel_2");
        assert_eq!(DetailRenderer::format_value(&gone, Some(&value), &store), "Relación: rel_2");
    }

    #[test]
    fn other_types_show_raw_or_dash() {
        let store = store();
        let text = FieldDefinition::new("1", "notes", FieldType::Textarea);
        assert_eq!(DetailRenderer::format_value(&text, Some(&FieldValue::text("hola")), &store), "hola");
        assert_eq!(DetailRenderer::format_value(&text, Some(&FieldValue::text("")), &store), "-");
        assert_eq!(DetailRenderer::format_value(&text, None, &store), "-");
    }

    #[test]
    fn view_carries_title_notes_and_module_info() {
        let mut store = store();
        let mut schema = store.get_module("products").unwrap().clone();
        schema.id = "orders".into();
        schema.name = "Pedidos".into();
        schema.fields.push(FieldDefinition::new("9", "customer", FieldType::Relation).relation("customers"));
        let mut relation = RelationDefinition::draft("r1");
        relation.name = "Cliente".into();
        relation.from_module = "orders".into();
        relation.to_module = "customers".into();
        schema.relations.push(relation);
        store.add_module(schema.clone());

        let unnamed = Record::new("7").with("price", 1500.0);
        let view = DetailRenderer::render(&schema, &unnamed, &store);
        assert_eq!(view.title, "Pedidos #7");
        assert_eq!(view.fields.len(), schema.fields.len());
        let customer = view.fields.iter().find(|f| f.name == "customer").unwrap();
        assert_eq!(customer.type_note, "Tipo: relation → Clientes");
        assert_eq!(customer.display, "-");
        assert_eq!(view.relations[0].summary, "Relación one-to-many con Clientes");
        assert_eq!(view.module.field_count, 8);
        assert_eq!(view.module.relation_count, 1);
        assert_eq!(view.module.status, "Activo");

        let named = Record::new("8").with("name", "Teclado");
        assert_eq!(DetailRenderer::render(&schema, &named, &store).title, "Teclado");
    }
}
