//! Module catalogue and record routes, mounted under `/api/v1`.

use crate::handlers::modules::{
    builder_options, create_module, create_relation, delete_module, list_modules, module_relations, read_module, update_module,
};
use crate::handlers::records::{create_record, delete_record, list_records, read_record, record_form, update_record};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn module_routes(state: AppState) -> Router {
    Router::new()
        .route("/builder-options", get(builder_options))
        .route("/modules", get(list_modules).post(create_module))
        .route(
            "/modules/:module_id",
            get(read_module).put(update_module).delete(delete_module),
        )
        .route("/modules/:module_id/relations", get(module_relations))
        .route("/relations", post(create_relation))
        .route("/modules/:module_id/records", get(list_records).post(create_record))
        .route(
            "/modules/:module_id/records/:record_id",
            get(read_record).put(update_record).delete(delete_record),
        )
        .route("/modules/:module_id/form", get(record_form))
        .with_state(state)
}
