//! Human readable labels for placeholder identifiers.

use std::collections::BTreeMap;

/// Maps placeholder identifiers to form labels.
///
/// Identifiers without a label are shown as themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderLabels {
    labels: BTreeMap<String, String>,
}

impl PlaceholderLabels {
    /// An empty table; every identifier labels itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels for the placeholders used by the built-in templates.
    pub fn builtin() -> Self {
        [
            ("product", "Product name"),
            ("company", "Company name"),
            ("inquiryDetails", "Inquiry details"),
            ("sender", "Sender name"),
            ("companyName", "Company name"),
            ("departmentName", "Department"),
            ("contactPersonName", "Contact person"),
            ("affiliation", "School or affiliation"),
            ("year", "Year"),
            ("myName", "Your name"),
            ("internshipDate", "Internship date"),
            ("absenceReason", "Reason for absence"),
            ("emailAddress", "Email address"),
            ("phoneNumber", "Phone number"),
        ]
        .into_iter()
        .collect()
    }

    pub fn with_label(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(name, label);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, label: impl Into<String>) -> Option<String> {
        self.labels.insert(name.into(), label.into())
    }

    /// Label for `name`, or `name` itself when none is registered.
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.labels.get(name).map(String::as_str).unwrap_or(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PlaceholderLabels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
