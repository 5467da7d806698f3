//! Modules seeded into an empty store.

use crate::schema::{FieldDefinition, FieldType, ModuleSchema, ModuleStatus};
use chrono::{DateTime, Utc};

pub fn default_modules(now: DateTime<Utc>) -> Vec<ModuleSchema> {
    vec![products_module(now), customers_module(now)]
}

fn products_module(now: DateTime<Utc>) -> ModuleSchema {
    ModuleSchema {
        id: "products".into(),
        name: "Productos".into(),
        description: "Gestión de catálogo de productos".into(),
        table_name: "products".into(),
        fields: vec![
            FieldDefinition::new("1", "id", FieldType::Number).required(),
            FieldDefinition::new("2", "name", FieldType::Text).required(),
            FieldDefinition::new("3", "description", FieldType::Textarea),
            FieldDefinition::new("4", "price", FieldType::Number).required(),
            FieldDefinition::new("5", "stock", FieldType::Number).required(),
            FieldDefinition::new("6", "category", FieldType::Select)
                .required()
                .with_options(["Electrónicos", "Ropa", "Hogar"]),
            FieldDefinition::new("7", "active", FieldType::Boolean),
        ],
        relations: Vec::new(),
        created_at: now,
        updated_at: now,
        status: ModuleStatus::Active,
    }
}

fn customers_module(now: DateTime<Utc>) -> ModuleSchema {
    ModuleSchema {
        id: "customers".into(),
        name: "Clientes".into(),
        description: "Base de datos de clientes".into(),
        table_name: "customers".into(),
        fields: vec![
            FieldDefinition::new("1", "id", FieldType::Number).required(),
            FieldDefinition::new("2", "name", FieldType::Text).required(),
            FieldDefinition::new("3", "email", FieldType::Email).required(),
            FieldDefinition::new("4", "phone", FieldType::Text),
            FieldDefinition::new("5", "company", FieldType::Text),
            FieldDefinition::new("6", "active", FieldType::Boolean),
        ],
        relations: Vec::new(),
        created_at: now,
        updated_at: now,
        status: ModuleStatus::Active,
    }
}
