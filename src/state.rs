//! Application state wiring settings, the template store, and the composer.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::template::{
    EmailComposer, PlaceholderLabels, RenderedEmail, Template, TemplateFields, TemplateResult,
    TemplateStore,
};

/// Everything a front end needs to browse, edit, and fill templates.
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: TemplateStore,
    pub composer: EmailComposer,
}

impl AppState {
    /// Open the configured store and start with nothing selected.
    pub fn new(settings: Settings) -> Result<Self> {
        let store = TemplateStore::from_config(&settings.storage)?;
        tracing::info!(templates = store.len(), "Template store opened");

        Ok(Self::with_store(settings, store))
    }

    /// Load settings from config files and environment, then open the store.
    pub fn from_env() -> Result<Self> {
        let settings = Settings::new()?;
        Self::new(settings)
    }

    pub fn with_store(settings: Settings, store: TemplateStore) -> Self {
        Self {
            settings: Arc::new(settings),
            store,
            composer: EmailComposer::new(PlaceholderLabels::builtin()),
        }
    }

    /// Select a stored template in the composer.
    pub fn select_template(&mut self, id: &str) -> TemplateResult<&Template> {
        let template = self.store.get(id)?.clone();
        self.composer.select(template);
        self.store.get(id)
    }

    /// Create a template and return its id.
    pub fn create_template(&mut self, fields: TemplateFields) -> TemplateResult<String> {
        self.store.create(fields.name, fields.subject, fields.body)
    }

    /// Save edits to a template. Editing the selected template re-selects it,
    /// which resets the form.
    pub fn save_template(&mut self, id: &str, fields: TemplateFields) -> TemplateResult<()> {
        let updated = self.store.update(id, fields)?;

        if self.is_selected(id) {
            self.composer.select(updated);
        }
        Ok(())
    }

    /// Delete a template, clearing the composer if it was selected.
    pub fn delete_template(&mut self, id: &str) -> TemplateResult<bool> {
        if self.is_selected(id) {
            self.composer.deselect();
        }

        self.store.delete(id)
    }

    /// Render the selected template with the composer's current values.
    pub fn render(&mut self) -> TemplateResult<&RenderedEmail> {
        self.composer.render()
    }

    fn is_selected(&self, id: &str) -> bool {
        self.composer.selected().is_some_and(|t| t.id == id)
    }
}
