//! Template types and error definitions

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::scanner::extract_placeholders_from;
use crate::storage::StorageError;

/// Label written in front of the subject line in plain-text output
pub const DEFAULT_SUBJECT_LABEL: &str = "Subject: ";

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template id already in use: {0}")]
    DuplicateId(String),

    #[error("No template selected")]
    NoTemplateSelected,

    #[error("Failed to decode stored templates: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode templates: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// An email template definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Unique template identifier
    pub id: String,

    /// Display label
    pub name: String,

    /// Subject line with {{placeholder}} tokens
    pub subject: String,

    /// Body text with {{placeholder}} tokens
    pub body: String,
}

impl Template {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    fn from_fields(id: String, fields: TemplateFields) -> Self {
        Self {
            id,
            name: fields.name,
            subject: fields.subject,
            body: fields.body,
        }
    }

    /// Replace name, subject and body, keeping the id.
    pub fn apply(&mut self, fields: TemplateFields) {
        self.name = fields.name;
        self.subject = fields.subject;
        self.body = fields.body;
    }

    /// Placeholder identifiers of subject then body, first occurrence order.
    pub fn placeholders(&self) -> Vec<String> {
        extract_placeholders_from(&[self.subject.as_str(), self.body.as_str()])
    }

    /// Editable fields of this template.
    pub fn fields(&self) -> TemplateFields {
        TemplateFields {
            name: self.name.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
        }
    }
}

/// The editable part of a template: everything except the id.
///
/// Also the persisted shape of one collection entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFields {
    pub name: String,
    pub subject: String,
    pub body: String,
}

impl TemplateFields {
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

#[derive(Serialize)]
struct TemplateFieldsRef<'a> {
    name: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// All templates keyed by id.
///
/// Iterates in ascending id order. Serializes as a JSON object of
/// `id -> { name, subject, body }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCollection {
    templates: BTreeMap<String, Template>,
}

impl TemplateCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Template> {
        self.templates.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Insert a template, returning the one it replaced if the id was taken.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        self.templates.insert(template.id.clone(), template)
    }

    /// Insert a template whose id must not exist yet.
    pub fn insert_new(&mut self, template: Template) -> TemplateResult<()> {
        match self.templates.entry(template.id.clone()) {
            btree_map::Entry::Occupied(_) => Err(TemplateError::DuplicateId(template.id)),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(template);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Template> {
        self.templates.remove(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Encode to the persisted JSON form.
    pub fn to_json(&self) -> TemplateResult<String> {
        serde_json::to_string(self).map_err(TemplateError::Encode)
    }

    /// Decode from the persisted JSON form.
    pub fn from_json(raw: &str) -> TemplateResult<Self> {
        serde_json::from_str(raw).map_err(TemplateError::Decode)
    }
}

impl FromIterator<Template> for TemplateCollection {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}

impl IntoIterator for TemplateCollection {
    type Item = Template;
    type IntoIter = btree_map::IntoValues<String, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.into_values()
    }
}

impl Serialize for TemplateCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.templates.len()))?;
        for (id, template) in &self.templates {
            map.serialize_entry(
                id,
                &TemplateFieldsRef {
                    name: &template.name,
                    subject: &template.subject,
                    body: &template.body,
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TemplateCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, TemplateFields>::deserialize(deserializer)?;
        Ok(Self {
            templates: raw
                .into_iter()
                .map(|(id, fields)| (id.clone(), Template::from_fields(id, fields)))
                .collect(),
        })
    }
}

/// Placeholder values for one render, keyed by identifier.
///
/// Iterates in ascending identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderContext {
    values: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A fully substituted email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

impl RenderedEmail {
    /// Plain text with the subject on its own line, a blank line, then the body.
    pub fn to_text(&self, subject_label: &str) -> String {
        format!("{}{}\n\n{}", subject_label, self.subject, self.body)
    }
}

impl fmt::Display for RenderedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(DEFAULT_SUBJECT_LABEL))
    }
}
