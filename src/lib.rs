//! ChatBot Manager: dynamic module schema engine with generated forms, detail views and sample data.

pub mod error;
pub mod handlers;
pub mod kv;
pub mod record;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod settings;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError, FormError, SchemaError, StorageError};
pub use kv::{FileStorage, KeyValueStorage, MemoryStorage};
pub use record::{FieldValue, Record};
pub use response::{error_body, success_created, success_many, success_one_ok};
pub use routes::{build_router, chat_routes, common_routes, module_routes};
pub use schema::{derive_table_name, FieldDefinition, FieldType, ModuleDraft, ModuleSchema, RelationDefinition};
pub use service::{DetailRenderer, GenericForm, RecordSet, SampleDataGenerator};
pub use settings::Settings;
pub use state::AppState;
pub use store::SchemaStore;
