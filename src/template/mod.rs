//! Email template system.
//!
//! This module provides:
//! - Template definition with variable placeholders ({{variable}})
//! - A token scanner for the placeholder grammar
//! - Template storage with CRUD operations and write-through persistence
//! - Variable substitution engine for rendering templates
//! - A composer tracking select / fill / render state for one template
//!
//! # Example
//!
//! ```ignore
//! let backend = Arc::new(MemoryKeyValueStore::new());
//! let mut store = TemplateStore::open(backend, "emailTemplates");
//!
//! let id = store.create("Reply", "Re: {{topic}}", "Hello {{name}}, about {{topic}}.")?;
//!
//! let values: RenderContext = [("topic", "Invoice"), ("name", "Sam")].into_iter().collect();
//! let rendered = store.render(&id, &values)?;
//! assert_eq!(rendered.subject, "Re: Invoice");
//! ```

mod composer;
mod defaults;
mod labels;
mod scanner;
mod store;
mod substitution;
mod types;

pub use composer::{ComposerState, EmailComposer, FormField};
pub use defaults::default_templates;
pub use labels::PlaceholderLabels;
pub use scanner::{extract_placeholders, extract_placeholders_from, tokens, Token, Tokens};
pub use store::{TemplateStore, GENERATED_ID_PREFIX};
pub use substitution::{render, substitute, unresolved_placeholders};
pub use types::{
    RenderContext, RenderedEmail, Template, TemplateCollection, TemplateError, TemplateFields,
    TemplateResult, DEFAULT_SUBJECT_LABEL,
};
