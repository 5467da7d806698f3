//! Module schema types, matching the persisted `dynamic_modules` snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Email,
    Date,
    Boolean,
    Select,
    Textarea,
    Relation,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Email,
        FieldType::Date,
        FieldType::Boolean,
        FieldType::Select,
        FieldType::Textarea,
        FieldType::Relation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
            FieldType::Relation => "relation",
        }
    }

    /// Label shown in the module builder's type picker.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Text => "Texto",
            FieldType::Number => "Número",
            FieldType::Email => "Email",
            FieldType::Date => "Fecha",
            FieldType::Boolean => "Booleano",
            FieldType::Select => "Selección",
            FieldType::Textarea => "Texto largo",
            FieldType::Relation => "Relación",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    OneToOne,
    #[default]
    OneToMany,
    ManyToMany,
}

impl RelationType {
    pub const ALL: [RelationType; 3] = [RelationType::OneToOne, RelationType::OneToMany, RelationType::ManyToMany];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "one-to-one",
            RelationType::OneToMany => "one-to-many",
            RelationType::ManyToMany => "many-to-many",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "Uno a Uno",
            RelationType::OneToMany => "Uno a Muchos",
            RelationType::ManyToMany => "Muchos a Muchos",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    #[default]
    Active,
    Draft,
}

impl ModuleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ModuleStatus::Active => "Activo",
            ModuleStatus::Draft => "Borrador",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Choices for `select` fields, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Target module id for `relation` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<RelationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            required: false,
            options: None,
            relation_to: None,
            relation_type: None,
            display_field: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn relation(mut self, module_id: impl Into<String>) -> Self {
        self.relation_to = Some(module_id.into());
        self
    }

    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub from_module: String,
    #[serde(default)]
    pub to_module: String,
    #[serde(default)]
    pub from_field: String,
    #[serde(default = "default_to_field")]
    pub to_field: String,
    #[serde(rename = "type", default)]
    pub relation_type: RelationType,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_to_field() -> String {
    "id".into()
}

impl RelationDefinition {
    /// Empty relation as added by the module builder: targets `id`, one-to-many.
    pub fn draft(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from_module: String::new(),
            to_module: String::new(),
            from_field: String::new(),
            to_field: default_to_field(),
            relation_type: RelationType::default(),
            name: String::new(),
            description: None,
        }
    }

    pub fn touches(&self, module_id: &str) -> bool {
        self.from_module == module_id || self.to_module == module_id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSchema {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub table_name: String,
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub relations: Vec<RelationDefinition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ModuleStatus,
}

impl ModuleSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_wire_names_are_camel_case() {
        let field = FieldDefinition::new("9", "owner", FieldType::Relation)
            .required()
            .relation("customers");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "relation");
        assert_eq!(json["relationTo"], "customers");
        assert_eq!(json["required"], true);
        assert!(json.get("options").is_none());
    }

    #[test]
    fn relation_defaults_when_fields_omitted() {
        let rel: RelationDefinition =
            serde_json::from_str(r#"{"id":"r1","toModule":"customers","type":"many-to-many"}"#).unwrap();
        assert_eq!(rel.to_field, "id");
        assert_eq!(rel.relation_type, RelationType::ManyToMany);
        assert!(rel.from_module.is_empty());
        assert!(rel.touches("customers"));
    }
}
