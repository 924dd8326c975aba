//! Form state for filling in one template and rendering it.
//!
//! ```text
//! NoTemplateSelected --select--> TemplateSelected --set_field--> FormFilled
//!                                        |                          |
//!                                        +---------render-----------+--> Rendered
//! ```
//!
//! Selecting a template (again or a different one) always starts over with
//! empty values. `Rendered` is not terminal: editing a field goes back to
//! `FormFilled`, and the last output stays readable until the next render.

use crate::metrics::RenderMetrics;

use super::labels::PlaceholderLabels;
use super::substitution::{render, unresolved_placeholders};
use super::types::{RenderContext, RenderedEmail, Template, TemplateError, TemplateResult};

/// Where the composer is in the select / fill / render cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    NoTemplateSelected,
    TemplateSelected,
    FormFilled,
    Rendered,
}

/// One input of the placeholder form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct EmailComposer {
    labels: PlaceholderLabels,
    selected: Option<Template>,
    values: RenderContext,
    rendered: Option<RenderedEmail>,
    state: ComposerState,
}

impl Default for EmailComposer {
    fn default() -> Self {
        Self::new(PlaceholderLabels::builtin())
    }
}

impl EmailComposer {
    pub fn new(labels: PlaceholderLabels) -> Self {
        Self {
            labels,
            selected: None,
            values: RenderContext::new(),
            rendered: None,
            state: ComposerState::NoTemplateSelected,
        }
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    pub fn selected(&self) -> Option<&Template> {
        self.selected.as_ref()
    }

    pub fn labels(&self) -> &PlaceholderLabels {
        &self.labels
    }

    /// Select a template, discarding any entered values and output.
    pub fn select(&mut self, template: Template) {
        tracing::debug!(template_id = %template.id, "Template selected");

        self.selected = Some(template);
        self.values.clear();
        self.rendered = None;
        self.state = ComposerState::TemplateSelected;
    }

    /// Drop the selection along with entered values and output.
    pub fn deselect(&mut self) {
        self.selected = None;
        self.values.clear();
        self.rendered = None;
        self.state = ComposerState::NoTemplateSelected;
    }

    /// Set the value of one placeholder field.
    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> TemplateResult<()> {
        if self.selected.is_none() {
            return Err(TemplateError::NoTemplateSelected);
        }

        self.values.insert(name, value);
        self.state = ComposerState::FormFilled;
        Ok(())
    }

    /// Current value of a field, empty when never set.
    pub fn field_value(&self, name: &str) -> &str {
        self.values.get(name).unwrap_or("")
    }

    pub fn values(&self) -> &RenderContext {
        &self.values
    }

    /// Inputs for the selected template's placeholders, in placeholder order.
    pub fn form_fields(&self) -> Vec<FormField> {
        let Some(template) = &self.selected else {
            return Vec::new();
        };

        template
            .placeholders()
            .into_iter()
            .map(|name| FormField {
                label: self.labels.label_for(&name).to_string(),
                value: self.field_value(&name).to_string(),
                name,
            })
            .collect()
    }

    /// Render the selected template with the current values.
    pub fn render(&mut self) -> TemplateResult<&RenderedEmail> {
        let template = self
            .selected
            .as_ref()
            .ok_or(TemplateError::NoTemplateSelected)?;

        let unresolved = unresolved_placeholders(template, &self.values);
        RenderMetrics::record_render(unresolved.len());
        tracing::debug!(
            template_id = %template.id,
            unresolved = unresolved.len(),
            "Rendered email"
        );

        self.state = ComposerState::Rendered;
        Ok(self.rendered.insert(render(template, &self.values)))
    }

    /// Output of the most recent render since the last selection.
    pub fn last_rendered(&self) -> Option<&RenderedEmail> {
        self.rendered.as_ref()
    }
}
