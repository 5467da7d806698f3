//! Module catalogue handlers: list, create, read, update, delete, relations.

use crate::error::{AppError, SchemaError};
use crate::response::{success_created, success_many, success_one_ok, success_with_message};
use crate::schema::{validate_schema, FieldType, ModuleDraft, RelationDefinition, RelationType};
use crate::service::ModuleSummary;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
pub struct TypeOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Serialize)]
pub struct BuilderOptions {
    pub field_types: Vec<TypeOption>,
    pub relation_types: Vec<TypeOption>,
}

/// Field and relation types offered by the module builder.
pub async fn builder_options() -> impl IntoResponse {
    success_one_ok(BuilderOptions {
        field_types: FieldType::ALL
            .iter()
            .map(|t| TypeOption {
                value: t.as_str(),
                label: t.label(),
            })
            .collect(),
        relation_types: RelationType::ALL
            .iter()
            .map(|t| TypeOption {
                value: t.as_str(),
                label: t.label(),
            })
            .collect(),
    })
}

pub async fn list_modules(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.read_store()?;
    let summaries: Vec<ModuleSummary> = store
        .all_modules()
        .into_iter()
        .map(ModuleSummary::from_schema)
        .collect();
    Ok(success_many(summaries))
}

pub async fn create_module(
    State(state): State<AppState>,
    Json(draft): Json<ModuleDraft>,
) -> Result<impl IntoResponse, AppError> {
    let mut store = state.write_store()?;
    let schema = draft.create(&mut store)?;
    let message = format!("Módulo creado: el módulo {} ha sido creado exitosamente", schema.name);
    Ok(success_with_message(StatusCode::CREATED, schema, message))
}

pub async fn read_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.read_store()?;
    let schema = store
        .get_module(&module_id)
        .cloned()
        .ok_or(SchemaError::UnknownModule(module_id))?;
    Ok(success_one_ok(schema))
}

/// Replace a module's definition with a draft-shaped body. Id and creation time are kept.
pub async fn update_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    Json(draft): Json<ModuleDraft>,
) -> Result<impl IntoResponse, AppError> {
    let mut store = state.write_store()?;
    if !store.contains_module(&module_id) {
        return Err(SchemaError::UnknownModule(module_id).into());
    }
    let schema = draft.build(&module_id, Utc::now());
    validate_schema(&schema, |id| id == module_id || store.contains_module(id))?;
    store.replace_module_relations(&module_id, &schema.relations);
    let updated = store.update_module(&module_id, schema)?.clone();
    drop(store);
    // Cached records were shaped by the old fields.
    state.write_records()?.remove(&module_id);
    Ok(success_with_message(StatusCode::OK, updated, "Módulo actualizado"))
}

pub async fn delete_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let existed = state.write_store()?.delete_module(&module_id);
    if !existed {
        return Err(SchemaError::UnknownModule(module_id).into());
    }
    state.write_records()?.remove(&module_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn module_relations(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.read_store()?;
    if !store.contains_module(&module_id) {
        return Err(SchemaError::UnknownModule(module_id).into());
    }
    let relations: Vec<RelationDefinition> = store
        .relations_for_module(&module_id)
        .into_iter()
        .cloned()
        .collect();
    Ok(success_many(relations))
}

pub async fn create_relation(
    State(state): State<AppState>,
    Json(mut relation): Json<RelationDefinition>,
) -> Result<impl IntoResponse, AppError> {
    let mut store = state.write_store()?;
    let mut errors = Vec::new();
    if relation.name.trim().is_empty() {
        errors.push("El nombre de la relación es requerido".to_string());
    }
    for module_id in [&relation.from_module, &relation.to_module] {
        if !store.contains_module(module_id) {
            errors.push(format!("Módulo relacionado no encontrado: {}", module_id));
        }
    }
    if !errors.is_empty() {
        return Err(SchemaError::Validation(errors).into());
    }
    if relation.id.trim().is_empty() {
        relation.id = format!("rel_{}", uuid::Uuid::new_v4().simple());
    }
    tracing::info!(relation_id = %relation.id, from = %relation.from_module, to = %relation.to_module, "relation created");
    store.add_relation(relation.clone());
    Ok(success_created(relation))
}
