//! Request validation for form submissions.
//!
//! Fields are deserialized loosely (as raw JSON values) so a wrong type becomes
//! a field-level message instead of a rejected request body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::repositories::CompanyInput;
use crate::repositories::company::{DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS};

/// Field name to human-readable message. Only the first failure per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Values echoed back to the form after a failed submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OldInput {
    pub name: String,
    pub description: String,
}

/// Body of the company create and update forms
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CompanyForm {
    /// Required, at most 255 characters
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Acme")]
    pub name: Option<Value>,
    /// Optional, at most 1000 characters; empty clears it
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
}

impl CompanyForm {
    /// Check the submitted values and produce the normalized field set
    pub fn validate(&self) -> Result<CompanyInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = match normalize(self.name.as_ref()) {
            Normalized::Missing => {
                errors.add("name", "The name field is required.");
                None
            }
            Normalized::NotAString => {
                errors.add("name", "The name field must be a string.");
                None
            }
            Normalized::Text(name) => {
                check_max("name", &name, NAME_MAX_CHARS, &mut errors);
                Some(name)
            }
        };

        let description = match normalize(self.description.as_ref()) {
            Normalized::Missing => None,
            Normalized::NotAString => {
                errors.add("description", "The description field must be a string.");
                None
            }
            Normalized::Text(description) => {
                check_max("description", &description, DESCRIPTION_MAX_CHARS, &mut errors);
                Some(description)
            }
        };

        match name {
            Some(name) if errors.is_empty() => Ok(CompanyInput { name, description }),
            _ => Err(errors),
        }
    }

    /// The raw submitted strings, for re-populating the form
    pub fn old_input(&self) -> OldInput {
        OldInput {
            name: raw_string(self.name.as_ref()),
            description: raw_string(self.description.as_ref()),
        }
    }
}

enum Normalized {
    Missing,
    NotAString,
    Text(String),
}

/// Trim strings and treat empty ones as absent
fn normalize(value: Option<&Value>) -> Normalized {
    match value {
        None | Some(Value::Null) => Normalized::Missing,
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Normalized::Missing
            } else {
                Normalized::Text(trimmed.to_string())
            }
        }
        Some(_) => Normalized::NotAString,
    }
}

fn check_max(field: &str, value: &str, max: usize, errors: &mut FieldErrors) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {} characters.",
                field, max
            ),
        );
    }
}

fn raw_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(raw)) => raw.clone(),
        _ => String::new(),
    }
}
