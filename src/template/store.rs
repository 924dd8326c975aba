//! Template storage with CRUD operations and write-through persistence

use std::sync::Arc;

use chrono::Utc;

use crate::config::StorageConfig;
use crate::metrics::{RenderMetrics, StoreMetrics};
use crate::storage::{create_key_value_store, KeyValueStore};

use super::defaults::default_templates;
use super::substitution::{render, unresolved_placeholders};
use super::types::{
    RenderContext, RenderedEmail, Template, TemplateCollection, TemplateError, TemplateFields,
    TemplateResult,
};

/// Prefix of generated template ids
pub const GENERATED_ID_PREFIX: &str = "template_";

/// Owns the template collection and persists it through a key-value backend.
///
/// Every mutation writes the full collection back under `key`. If the write
/// fails the in-memory change is rolled back before the error is returned.
pub struct TemplateStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    templates: TemplateCollection,
}

impl TemplateStore {
    /// Open a store over `backend`, loading whatever is persisted under `key`.
    pub fn open(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut store = Self {
            backend,
            key: key.into(),
            templates: TemplateCollection::new(),
        };
        store.templates = store.load();
        StoreMetrics::set_stored(store.templates.len());
        store
    }

    /// Build the configured backend and open a store over it.
    pub fn from_config(config: &StorageConfig) -> TemplateResult<Self> {
        let backend = create_key_value_store(config)?;
        Ok(Self::open(backend, config.key.clone()))
    }

    /// Read the persisted collection.
    ///
    /// Falls back to the built-in templates when nothing is stored, the
    /// backend cannot be read, or the stored value does not decode. Never
    /// writes; a corrupt value stays in place until the next save.
    pub fn load(&self) -> TemplateCollection {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!(key = %self.key, "No stored templates, using defaults");
                StoreMetrics::record_load("default_absent");
                return default_templates();
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    backend = self.backend.backend_name(),
                    error = %e,
                    "Failed to read stored templates, using defaults"
                );
                StoreMetrics::record_load("default_unreadable");
                return default_templates();
            }
        };

        match TemplateCollection::from_json(&raw) {
            Ok(collection) => {
                tracing::debug!(
                    key = %self.key,
                    count = collection.len(),
                    "Loaded stored templates"
                );
                StoreMetrics::record_load("persisted");
                collection
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "Stored templates are corrupt, using defaults"
                );
                StoreMetrics::record_load("default_corrupt");
                default_templates()
            }
        }
    }

    /// Replace the in-memory collection with a fresh `load`.
    pub fn reload(&mut self) {
        self.templates = self.load();
        StoreMetrics::set_stored(self.templates.len());
    }

    /// Serialize and persist `collection`, replacing whatever was stored.
    pub fn save(&self, collection: &TemplateCollection) -> TemplateResult<()> {
        let encoded = collection.to_json()?;

        if let Err(e) = self.backend.set(&self.key, &encoded) {
            StoreMetrics::record_save_error();
            tracing::error!(
                key = %self.key,
                backend = self.backend.backend_name(),
                error = %e,
                "Failed to persist templates"
            );
            return Err(e.into());
        }

        tracing::debug!(key = %self.key, count = collection.len(), "Persisted templates");
        Ok(())
    }

    /// Persist the current collection. On failure `undo` reverts the
    /// in-memory change so the store matches what is stored.
    fn commit(&mut self, undo: impl FnOnce(&mut TemplateCollection)) -> TemplateResult<()> {
        if let Err(e) = self.save(&self.templates) {
            undo(&mut self.templates);
            return Err(e);
        }

        StoreMetrics::set_stored(self.templates.len());
        Ok(())
    }

    /// Create a template with a freshly generated id and return the id.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> TemplateResult<String> {
        let id = self.generate_id();
        self.templates.insert_new(Template::new(id.clone(), name, subject, body))?;

        self.commit(|templates| {
            templates.remove(&id);
        })?;

        StoreMetrics::record_operation("create");
        tracing::info!(template_id = %id, "Template created");
        Ok(id)
    }

    /// Replace the name, subject and body of an existing template.
    pub fn update(&mut self, id: &str, fields: TemplateFields) -> TemplateResult<Template> {
        let template = self
            .templates
            .get_mut(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        let previous = template.clone();
        template.apply(fields);
        let updated = template.clone();

        self.commit(|templates| {
            templates.insert(previous);
        })?;

        StoreMetrics::record_operation("update");
        tracing::info!(template_id = %id, "Template updated");
        Ok(updated)
    }

    /// Remove a template. Missing ids are not an error; the collection is
    /// persisted either way. Returns whether a template was removed.
    pub fn delete(&mut self, id: &str) -> TemplateResult<bool> {
        let removed = self.templates.remove(id);
        let was_present = removed.is_some();

        self.commit(|templates| {
            if let Some(template) = removed {
                templates.insert(template);
            }
        })?;

        if was_present {
            StoreMetrics::record_operation("delete");
            tracing::info!(template_id = %id, "Template deleted");
        } else {
            tracing::debug!(template_id = %id, "Delete of unknown template ignored");
        }
        Ok(was_present)
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<&Template> {
        self.templates
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// List all templates in id order
    pub fn list(&self) -> Vec<&Template> {
        self.templates.iter().collect()
    }

    /// Check if a template exists
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains(id)
    }

    /// Get the number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> &TemplateCollection {
        &self.templates
    }

    /// Placeholder identifiers of a stored template
    pub fn placeholders(&self, id: &str) -> TemplateResult<Vec<String>> {
        Ok(self.get(id)?.placeholders())
    }

    /// Render a stored template with values
    pub fn render(&self, id: &str, values: &RenderContext) -> TemplateResult<RenderedEmail> {
        let template = self.get(id)?;
        let rendered = render(template, values);

        RenderMetrics::record_render(unresolved_placeholders(template, values).len());
        Ok(rendered)
    }

    /// `template_<unix millis>`, bumped until unused.
    fn generate_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let id = format!("{}{}", GENERATED_ID_PREFIX, millis);
            if !self.templates.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryKeyValueStore, StorageError, StorageResult};
    use std::sync::atomic::{AtomicBool, Ordering};

    const KEY: &str = "emailTemplates";

    struct FailingBackend;

    impl KeyValueStore for FailingBackend {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("read refused".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("write refused".to_string()))
        }
    }

    /// Refuses the first write, then behaves like the memory backend.
    struct FailFirstWrite {
        inner: MemoryKeyValueStore,
        failed: AtomicBool,
    }

    impl FailFirstWrite {
        fn new() -> Self {
            Self {
                inner: MemoryKeyValueStore::new(),
                failed: AtomicBool::new(false),
            }
        }
    }

    impl KeyValueStore for FailFirstWrite {
        fn backend_name(&self) -> &'static str {
            "fail_first_write"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(StorageError::Unavailable("first write refused".to_string()));
            }
            self.inner.set(key, value)
        }
    }

    fn empty_store() -> (Arc<MemoryKeyValueStore>, TemplateStore) {
        let backend = Arc::new(MemoryKeyValueStore::with_value(KEY, "{}"));
        let store = TemplateStore::open(backend.clone(), KEY);
        (backend, store)
    }

    fn persisted(backend: &MemoryKeyValueStore) -> TemplateCollection {
        TemplateCollection::from_json(&backend.get(KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_open_without_state_uses_defaults() {
        let store = TemplateStore::open(Arc::new(MemoryKeyValueStore::new()), KEY);
        assert_eq!(store.templates(), &default_templates());

        let ids: Vec<&str> = store.list().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["inquiry", "internshipAbsence"]);
    }

    #[test]
    fn test_open_with_corrupt_state_uses_defaults() {
        let backend = Arc::new(MemoryKeyValueStore::with_value(KEY, "{not json"));
        let store = TemplateStore::open(backend.clone(), KEY);

        assert_eq!(store.templates(), &default_templates());
        // Loading never overwrites what is stored
        assert_eq!(backend.get(KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_open_with_unreadable_backend_uses_defaults() {
        let store = TemplateStore::open(Arc::new(FailingBackend), KEY);
        assert_eq!(store.templates(), &default_templates());
    }

    #[test]
    fn test_open_with_empty_collection_stays_empty() {
        let (_, store) = empty_store();
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_generates_unique_ids() {
        let (_, mut store) = empty_store();

        let first = store.create("One", "s", "b").unwrap();
        let second = store.create("Two", "s", "b").unwrap();
        let third = store.create("Three", "s", "b").unwrap();

        assert!(first.starts_with(GENERATED_ID_PREFIX));
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_create_persists() {
        let (backend, mut store) = empty_store();

        let id = store.create("Greeting", "Hi {{name}}", "Hello {{name}}").unwrap();

        let saved = persisted(&backend);
        let template = saved.get(&id).unwrap();
        assert_eq!(template.name, "Greeting");
        assert_eq!(template.subject, "Hi {{name}}");
    }

    #[test]
    fn test_update_replaces_fields_and_persists() {
        let (backend, mut store) = empty_store();
        let id = store.create("Original", "s", "b").unwrap();

        let updated = store
            .update(&id, TemplateFields::new("Updated", "New {{x}}", "Body {{y}}"))
            .unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "Updated");

        assert_eq!(store.get(&id).unwrap().subject, "New {{x}}");
        assert_eq!(persisted(&backend).get(&id).unwrap().body, "Body {{y}}");
    }

    #[test]
    fn test_update_missing_id_fails_without_change() {
        let (backend, mut store) = empty_store();
        store.create("Keep", "s", "b").unwrap();
        let before = store.templates().clone();
        let stored_before = backend.get(KEY).unwrap();

        let result = store.update("missing", TemplateFields::new("x", "y", "z"));

        assert!(matches!(result, Err(TemplateError::NotFound(id)) if id == "missing"));
        assert_eq!(store.templates(), &before);
        assert_eq!(backend.get(KEY).unwrap(), stored_before);
    }

    #[test]
    fn test_delete_removes_and_persists() {
        let (backend, mut store) = empty_store();
        let id = store.create("Doomed", "s", "b").unwrap();

        assert!(store.delete(&id).unwrap());
        assert!(!store.contains(&id));
        assert!(persisted(&backend).is_empty());
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let (_, mut store) = empty_store();
        store.create("Keep", "s", "b").unwrap();
        let before = store.templates().clone();

        assert!(!store.delete("missing").unwrap());
        assert_eq!(store.templates(), &before);
    }

    #[test]
    fn test_failed_create_is_rolled_back() {
        let mut store = TemplateStore::open(Arc::new(FailingBackend), KEY);
        let before = store.templates().clone();

        let result = store.create("New", "s", "b");

        assert!(matches!(result, Err(TemplateError::Storage(_))));
        assert_eq!(store.templates(), &before);
    }

    #[test]
    fn test_failed_update_restores_previous() {
        let mut store = TemplateStore::open(Arc::new(FailingBackend), KEY);
        let before = store.get("inquiry").unwrap().clone();

        let result = store.update("inquiry", TemplateFields::new("x", "New {{x}}", "z"));

        assert!(matches!(result, Err(TemplateError::Storage(_))));
        assert_eq!(store.get("inquiry").unwrap(), &before);
    }

    #[test]
    fn test_failed_delete_keeps_template() {
        let mut store = TemplateStore::open(Arc::new(FailingBackend), KEY);
        let before = store.templates().clone();

        assert!(matches!(
            store.delete("inquiry"),
            Err(TemplateError::Storage(_))
        ));
        assert_eq!(store.templates(), &before);
    }

    #[test]
    fn test_retry_after_failed_create_persists_once() {
        let backend = Arc::new(FailFirstWrite::new());
        let mut store = TemplateStore::open(backend.clone(), KEY);
        let seeded = store.len();

        assert!(store.create("Reply", "Re: {{topic}}", "Hi").is_err());
        let id = store.create("Reply", "Re: {{topic}}", "Hi").unwrap();

        assert_eq!(store.len(), seeded + 1);
        let reopened = TemplateStore::open(backend, KEY);
        let replies: Vec<&str> = reopened
            .list()
            .iter()
            .filter(|t| t.name == "Reply")
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(replies, vec![id.as_str()]);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_, store) = empty_store();
        let collection: TemplateCollection = [
            Template::new("a", "A", "Re: {{topic}}", "Hello {{name}}"),
            Template::new("b", "B", "", ""),
        ]
        .into_iter()
        .collect();

        store.save(&collection).unwrap();
        assert_eq!(store.load(), collection);
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let (backend, mut store) = empty_store();
        backend
            .set(KEY, r#"{"x":{"name":"X","subject":"s","body":"b"}}"#)
            .unwrap();

        store.reload();
        assert_eq!(store.get("x").unwrap().name, "X");
    }

    #[test]
    fn test_render_stored_template() {
        let (_, mut store) = empty_store();
        let id = store
            .create("Reply", "Re: {{topic}}", "Hello {{name}}, about {{topic}}.")
            .unwrap();

        let values: RenderContext = [("topic", "Invoice"), ("name", "Sam")].into_iter().collect();
        let rendered = store.render(&id, &values).unwrap();

        assert_eq!(rendered.subject, "Re: Invoice");
        assert_eq!(rendered.body, "Hello Sam, about Invoice.");
    }

    #[test]
    fn test_render_missing_template() {
        let (_, store) = empty_store();
        assert!(matches!(
            store.render("missing", &RenderContext::new()),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_placeholders_of_stored_template() {
        let store = TemplateStore::open(Arc::new(MemoryKeyValueStore::new()), KEY);
        assert_eq!(
            store.placeholders("inquiry").unwrap(),
            vec!["product", "company", "inquiryDetails", "sender"]
        );
    }

    #[test]
    fn test_from_config_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: "file".to_string(),
            path: dir.path().to_path_buf(),
            key: KEY.to_string(),
        };

        let mut store = TemplateStore::from_config(&config).unwrap();
        let id = store.create("Saved", "s", "b").unwrap();

        let reopened = TemplateStore::from_config(&config).unwrap();
        assert_eq!(reopened.get(&id).unwrap().name, "Saved");
        assert!(reopened.contains("inquiry"));
    }
}
