//! Schema store: the catalogue of module schemas and relation definitions.
//!
//! Both collections are kept in insertion order and written as a single snapshot under
//! [`STORAGE_KEY`] after every mutation. Loading never fails the caller: a missing or
//! unreadable snapshot reseeds the default modules. Write failures are logged and the
//! in-memory state keeps the mutation.

use crate::error::{SchemaError, StorageError};
use crate::kv::KeyValueStorage;
use crate::schema::{default_modules, ModuleSchema, RelationDefinition};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fixed key of the persisted snapshot.
pub const STORAGE_KEY: &str = "dynamic_modules";

/// Persisted layout: `{modules: [[id, schema]...], relations: [[id, relation]...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    pub modules: Vec<(String, ModuleSchema)>,
    #[serde(default)]
    pub relations: Vec<(String, RelationDefinition)>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    modules: &'a [(String, ModuleSchema)],
    relations: &'a [(String, RelationDefinition)],
}

/// Insert or overwrite by id; an overwrite keeps the original position.
fn upsert<T>(entries: &mut Vec<(String, T)>, id: String, value: T) {
    match entries.iter_mut().find(|(k, _)| *k == id) {
        Some(slot) => slot.1 = value,
        None => entries.push((id, value)),
    }
}

pub struct SchemaStore {
    storage: Arc<dyn KeyValueStorage>,
    modules: Vec<(String, ModuleSchema)>,
    relations: Vec<(String, RelationDefinition)>,
    initialized: bool,
}

impl SchemaStore {
    /// Store over `storage`, not yet loaded. Reads see an empty catalogue until [`init`](Self::init).
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            modules: Vec::new(),
            relations: Vec::new(),
            initialized: false,
        }
    }

    /// Construct and load.
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let mut store = Self::new(storage);
        store.init();
        store
    }

    /// Load the persisted snapshot, or seed defaults when there is none. No-op after the first call.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.load();
        self.initialized = true;
        tracing::info!(modules = self.modules.len(), relations = self.relations.len(), "schema store initialized");
    }

    /// Drop in-memory state and load again from storage.
    pub fn reload(&mut self) {
        self.initialized = false;
        self.modules.clear();
        self.relations.clear();
        self.init();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn load(&mut self) {
        match self.read_snapshot() {
            Ok(Some(snapshot)) => {
                self.modules = snapshot.modules;
                self.relations = snapshot.relations;
                tracing::debug!(modules = self.modules.len(), "snapshot loaded");
            }
            Ok(None) => {
                tracing::info!("no persisted modules, seeding defaults");
                self.seed_defaults();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load persisted modules, seeding defaults");
                self.seed_defaults();
            }
        }
    }

    fn read_snapshot(&self) -> Result<Option<Snapshot>, StorageError> {
        match self.storage.get(STORAGE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn seed_defaults(&mut self) {
        for module in default_modules(Utc::now()) {
            upsert(&mut self.modules, module.id.clone(), module);
        }
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.write_snapshot() {
            tracing::error!(error = %e, "failed to persist modules");
        }
    }

    fn write_snapshot(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&SnapshotRef {
            modules: &self.modules,
            relations: &self.relations,
        })?;
        self.storage.set(STORAGE_KEY, &raw)
    }

    pub fn add_module(&mut self, module: ModuleSchema) {
        self.init();
        tracing::debug!(module_id = %module.id, name = %module.name, "adding module");
        upsert(&mut self.modules, module.id.clone(), module);
        self.persist();
    }

    /// Replace an existing module. Keeps its id and creation time, refreshes `updated_at`.
    pub fn update_module(&mut self, id: &str, mut module: ModuleSchema) -> Result<&ModuleSchema, SchemaError> {
        self.init();
        let slot = self
            .modules
            .iter_mut()
            .find(|(k, _)| k == id)
            .ok_or_else(|| SchemaError::UnknownModule(id.to_string()))?;
        module.id = id.to_string();
        module.created_at = slot.1.created_at;
        module.updated_at = Utc::now();
        slot.1 = module;
        self.persist();
        tracing::debug!(module_id = %id, "module updated");
        self.get_module(id)
            .ok_or_else(|| SchemaError::UnknownModule(id.to_string()))
    }

    pub fn get_module(&self, id: &str) -> Option<&ModuleSchema> {
        self.modules.iter().find(|(k, _)| k == id).map(|(_, m)| m)
    }

    pub fn contains_module(&self, id: &str) -> bool {
        self.get_module(id).is_some()
    }

    /// All modules in insertion order.
    pub fn all_modules(&self) -> Vec<&ModuleSchema> {
        self.modules.iter().map(|(_, m)| m).collect()
    }

    pub fn add_relation(&mut self, relation: RelationDefinition) {
        self.init();
        upsert(&mut self.relations, relation.id.clone(), relation);
        self.persist();
    }

    /// Relations where the module is the source or the target.
    pub fn relations_for_module(&self, module_id: &str) -> Vec<&RelationDefinition> {
        self.relations
            .iter()
            .map(|(_, r)| r)
            .filter(|r| r.touches(module_id))
            .collect()
    }

    /// Make `relations` the set declared by `module_id`. Relations it declared before
    /// that are missing from `relations` are dropped; the rest are upserted.
    pub fn replace_module_relations(&mut self, module_id: &str, relations: &[RelationDefinition]) {
        self.init();
        let before = self.relations.len();
        self.relations
            .retain(|(k, r)| r.from_module != module_id || relations.iter().any(|n| n.id == *k));
        let dropped = before - self.relations.len();
        for relation in relations {
            upsert(&mut self.relations, relation.id.clone(), relation.clone());
        }
        self.persist();
        tracing::debug!(module_id = %module_id, kept = relations.len(), dropped, "module relations replaced");
    }

    pub fn all_relations(&self) -> Vec<&RelationDefinition> {
        self.relations.iter().map(|(_, r)| r).collect()
    }

    /// Remove the module and every relation referencing it. Returns whether the module existed.
    pub fn delete_module(&mut self, id: &str) -> bool {
        self.init();
        let before = self.modules.len();
        self.modules.retain(|(k, _)| k != id);
        let existed = self.modules.len() != before;
        let relations_before = self.relations.len();
        self.relations.retain(|(_, r)| !r.touches(id));
        self.persist();
        tracing::info!(
            module_id = %id,
            existed,
            relations_removed = relations_before - self.relations.len(),
            "module deleted"
        );
        existed
    }

    /// Empty both collections and drop the persisted snapshot.
    pub fn clear_all(&mut self) {
        self.modules.clear();
        self.relations.clear();
        if let Err(e) = self.storage.remove(STORAGE_KEY) {
            tracing::error!(error = %e, "failed to remove persisted modules");
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStorage;
    use crate::schema::{FieldDefinition, FieldType, ModuleStatus, RelationType};

    struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Poisoned)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    fn module(id: &str) -> ModuleSchema {
        let now = Utc::now();
        ModuleSchema {
            id: id.into(),
            name: format!("Módulo {}", id),
            description: String::new(),
            table_name: id.into(),
            fields: vec![
                FieldDefinition::new("1", "id", FieldType::Number).required(),
                FieldDefinition::new("2", "name", FieldType::Text),
            ],
            relations: Vec::new(),
            created_at: now,
            updated_at: now,
            status: ModuleStatus::Draft,
        }
    }

    fn relation(id: &str, from: &str, to: &str) -> RelationDefinition {
        RelationDefinition {
            from_module: from.into(),
            to_module: to.into(),
            name: id.into(),
            relation_type: RelationType::OneToOne,
            ..RelationDefinition::draft(id)
        }
    }

    fn ids(store: &SchemaStore) -> Vec<String> {
        store.all_modules().iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn empty_storage_seeds_and_persists_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SchemaStore::open(storage.clone());
        assert_eq!(ids(&store), vec!["products", "customers"]);
        assert_eq!(store.get_module("products").unwrap().name, "Productos");
        assert_eq!(store.get_module("customers").unwrap().name, "Clientes");

        let raw = storage.get(STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["modules"][0][0], "products");
        assert_eq!(json["modules"][0][1]["tableName"], "products");
        assert_eq!(json["relations"], serde_json::json!([]));
    }

    #[test]
    fn init_is_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = SchemaStore::new(storage.clone());
        assert!(store.all_modules().is_empty());
        store.init();
        store.delete_module("customers");
        let persisted = storage.get(STORAGE_KEY).unwrap();
        store.init();
        assert_eq!(ids(&store), vec!["products"]);
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), persisted);
    }

    #[test]
    fn reopen_reproduces_modules_and_fields() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = SchemaStore::open(storage.clone());
        store.add_module(module("orders"));
        store.add_relation(relation("r1", "orders", "customers"));

        let reopened = SchemaStore::open(storage);
        let mut before = ids(&store);
        let mut after = ids(&reopened);
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert_eq!(
            reopened.get_module("orders").unwrap().fields,
            store.get_module("orders").unwrap().fields
        );
        assert_eq!(reopened.relations_for_module("orders").len(), 1);
    }

    #[test]
    fn corrupt_snapshot_reseeds_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(STORAGE_KEY, "{not json").unwrap();
        let store = SchemaStore::open(storage.clone());
        assert_eq!(ids(&store), vec!["products", "customers"]);
        let raw = storage.get(STORAGE_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<Snapshot>(&raw).is_ok());
    }

    #[test]
    fn unreadable_storage_keeps_working_in_memory() {
        let mut store = SchemaStore::open(Arc::new(FailingStorage));
        assert_eq!(ids(&store), vec!["products", "customers"]);
        store.add_module(module("orders"));
        assert!(store.contains_module("orders"));
        store.clear_all();
        assert!(store.all_modules().is_empty());
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut store = SchemaStore::open(Arc::new(MemoryStorage::new()));
        let mut products = store.get_module("products").unwrap().clone();
        products.name = "Catálogo".into();
        store.add_module(products);
        assert_eq!(ids(&store), vec!["products", "customers"]);
        assert_eq!(store.get_module("products").unwrap().name, "Catálogo");
    }

    #[test]
    fn delete_cascades_relations() {
        let mut store = SchemaStore::open(Arc::new(MemoryStorage::new()));
        store.add_module(module("orders"));
        store.add_relation(relation("r1", "orders", "customers"));
        store.add_relation(relation("r2", "products", "orders"));
        store.add_relation(relation("r3", "products", "customers"));

        assert!(store.delete_module("orders"));
        assert!(!ids(&store).contains(&"orders".to_string()));
        for id in ["orders", "customers", "products"] {
            assert!(store.relations_for_module(id).iter().all(|r| !r.touches("orders")));
        }
        assert_eq!(store.all_relations().len(), 1);
        assert!(!store.delete_module("orders"));
    }

    #[test]
    fn update_keeps_identity() {
        let mut store = SchemaStore::open(Arc::new(MemoryStorage::new()));
        let created = store.get_module("customers").unwrap().created_at;
        let mut edited = module("whatever");
        edited.name = "Clientes VIP".into();
        let updated = store.update_module("customers", edited).unwrap();
        assert_eq!(updated.id, "customers");
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.name, "Clientes VIP");
        assert!(matches!(
            store.update_module("ghost", module("ghost")),
            Err(SchemaError::UnknownModule(_))
        ));
    }

    #[test]
    fn replacing_relations_drops_stale_ones() {
        let mut store = SchemaStore::open(Arc::new(MemoryStorage::new()));
        store.add_module(module("orders"));
        store.add_relation(relation("r1", "orders", "customers"));
        store.add_relation(relation("r2", "orders", "products"));
        store.add_relation(relation("r3", "products", "orders"));

        let mut kept = relation("r2", "orders", "products");
        kept.name = "renamed".into();
        store.replace_module_relations("orders", &[kept, relation("r4", "orders", "customers")]);

        let mut outgoing: Vec<&str> = store
            .all_relations()
            .into_iter()
            .filter(|r| r.from_module == "orders")
            .map(|r| r.id.as_str())
            .collect();
        outgoing.sort();
        assert_eq!(outgoing, vec!["r2", "r4"]);
        assert_eq!(store.all_relations().len(), 3);
        assert!(store.all_relations().iter().any(|r| r.id == "r2" && r.name == "renamed"));
        assert!(store.all_relations().iter().any(|r| r.id == "r3"));
    }

    #[test]
    fn clear_then_reload_reseeds() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = SchemaStore::open(storage.clone());
        store.add_module(module("orders"));
        store.clear_all();
        assert!(store.all_modules().is_empty());
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);
        store.reload();
        assert_eq!(ids(&store), vec!["products", "customers"]);
    }
}
