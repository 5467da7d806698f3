//! Record handlers for a module: list/search, create, detail, update, delete, form description.

use crate::error::{AppError, SchemaError};
use crate::record::Record;
use crate::response::{success_many, success_one_ok, success_with_message};
use crate::schema::ModuleSchema;
use crate::service::{format_cell, DetailRenderer, FieldEditor, FormMode, GenericForm, RecordSet};
use crate::state::AppState;
use crate::store::SchemaStore;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormParams {
    #[serde(default)]
    pub record: Option<String>,
}

#[derive(Serialize)]
pub struct RecordRow {
    #[serde(flatten)]
    pub record: Record,
    /// List-view text per field.
    pub cells: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub struct FormView {
    pub title: String,
    pub mode: FormMode,
    pub record_id: Option<String>,
    pub fields: Vec<FieldEditor>,
    pub preview: Vec<(String, String)>,
}

fn schema_of(store: &SchemaStore, module_id: &str) -> Result<ModuleSchema, AppError> {
    store
        .get_module(module_id)
        .cloned()
        .ok_or_else(|| SchemaError::UnknownModule(module_id.to_string()).into())
}

fn body_to_map(value: Value) -> Result<serde_json::Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Run `f` over the module's record set, seeding it on first use.
fn with_records<T>(
    state: &AppState,
    schema: &ModuleSchema,
    f: impl FnOnce(&mut RecordSet) -> T,
) -> Result<T, AppError> {
    let mut sets = state.write_records()?;
    let set = sets
        .entry(schema.id.clone())
        .or_insert_with(|| RecordSet::seeded(schema));
    Ok(f(set))
}

fn fill_form(form: &mut GenericForm, body: Value, store: &SchemaStore) -> Result<(), AppError> {
    for (field, value) in body_to_map(body)? {
        form.set_json(&field, &value, store)?;
    }
    Ok(())
}

fn row(schema: &ModuleSchema, record: &Record) -> RecordRow {
    let cells = schema
        .fields
        .iter()
        .map(|f| (f.name.clone(), format_cell(f, record.get(&f.name))))
        .collect();
    RecordRow {
        record: record.clone(),
        cells,
    }
}

pub async fn list_records(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let schema = schema_of(&*state.read_store()?, &module_id)?;
    let term = params.search.unwrap_or_default();
    let rows = with_records(&state, &schema, |set| {
        set.search(&term)
            .into_iter()
            .map(|r| row(&schema, r))
            .collect::<Vec<_>>()
    })?;
    Ok(success_many(rows))
}

pub async fn create_record(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.read_store()?;
    let schema = schema_of(&store, &module_id)?;
    let mut form = GenericForm::new(&schema, None);
    fill_form(&mut form, body, &store)?;
    drop(store);

    let mut submitted = None;
    let outcome = form.submit(|record| submitted = Some(record))?;
    let record = submitted.ok_or_else(|| AppError::Internal("form produced no record".into()))?;
    let created = with_records(&state, &schema, |set| set.add(record).clone())?;
    tracing::info!(module_id = %module_id, record_id = %created.id, "record created");
    Ok(success_with_message(StatusCode::CREATED, created, outcome.message))
}

pub async fn read_record(
    State(state): State<AppState>,
    Path((module_id, record_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.read_store()?;
    let schema = schema_of(&store, &module_id)?;
    let record = with_records(&state, &schema, |set| set.get(&record_id).cloned())?
        .ok_or_else(|| AppError::NotFound(record_id))?;
    Ok(success_one_ok(DetailRenderer::render(&schema, &record, &store)))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path((module_id, record_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.read_store()?;
    let schema = schema_of(&store, &module_id)?;
    let existing = with_records(&state, &schema, |set| set.get(&record_id).cloned())?
        .ok_or_else(|| AppError::NotFound(record_id.clone()))?;
    let mut form = GenericForm::new(&schema, Some(&existing));
    fill_form(&mut form, body, &store)?;
    drop(store);

    let mut submitted = None;
    let outcome = form.submit(|record| submitted = Some(record))?;
    let record = submitted.ok_or_else(|| AppError::Internal("form produced no record".into()))?;
    let updated = with_records(&state, &schema, |set| set.replace(&record_id, record).cloned())?
        .ok_or_else(|| AppError::NotFound(record_id.clone()))?;
    tracing::info!(module_id = %module_id, record_id = %record_id, "record updated");
    Ok(success_with_message(StatusCode::OK, updated, outcome.message))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path((module_id, record_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let schema = schema_of(&*state.read_store()?, &module_id)?;
    with_records(&state, &schema, |set| set.remove(&record_id))?
        .ok_or_else(|| AppError::NotFound(record_id.clone()))?;
    tracing::info!(module_id = %module_id, record_id = %record_id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Editor descriptions for a blank form, or for editing `?record=<id>`.
pub async fn record_form(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    Query(params): Query<FormParams>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.read_store()?;
    let schema = schema_of(&store, &module_id)?;
    let existing = match params.record {
        Some(record_id) => Some(
            with_records(&state, &schema, |set| set.get(&record_id).cloned())?
                .ok_or(AppError::NotFound(record_id))?,
        ),
        None => None,
    };
    let form = GenericForm::new(&schema, existing.as_ref());
    Ok(success_one_ok(FormView {
        title: form.title(),
        mode: form.mode(),
        record_id: existing.map(|r| r.id),
        fields: form.editors(&store),
        preview: form.preview(),
    }))
}
