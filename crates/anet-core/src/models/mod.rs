//! View models wrapping server records.
//!
//! Every model deserializes from a possibly partial camelCase record merged
//! over its defaults, and exposes pure helpers (display name, route paths,
//! type predicates) plus a validation schema that form bindings evaluate
//! synchronously.

pub mod authorization_group;
mod instant;
pub mod location;
pub mod organization;
pub mod person;
pub mod position;
pub mod report;
pub mod subscription;
pub mod task;

use crate::email::EmailPolicy;
use crate::error::{AnetError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};

pub use authorization_group::{AuthorizationGroup, AuthorizationGroupInput};
pub use location::Location;
pub use organization::{ApprovalStep, ApprovalStepInput, Organization, OrganizationInput};
pub use person::Person;
pub use position::Position;
pub use report::{Attendee, Report, ReportApprovalAction};
pub use subscription::{SubscribedObject, Subscription};
pub use task::Task;

// ---------------------------------------------------------------------------
// Reference
// ---------------------------------------------------------------------------

/// Bare identity of another record, as sent in mutation inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub uuid: String,
}

impl Reference {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into() }
    }
}

/// `{uuid}` for a model that has been saved, `None` otherwise.
pub fn get_reference<M: Model>(model: &M) -> Option<Reference> {
    model.uuid().map(Reference::new)
}

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Empty,
    Text(String),
    Number(f64),
    Count(usize),
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        if value.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Text(value.to_string())
        }
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map(FieldValue::text).unwrap_or(FieldValue::Empty)
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
            FieldValue::Count(n) => *n == 0,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Count(n) => n.to_string(),
        }
    }
}

/// Blank input clears an optional text field.
pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub(crate) fn parse_number(field: &str, value: &str) -> Result<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|e| AnetError::InvalidFieldValue {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

pub(crate) fn unknown_field<M: Model>(field: &str) -> AnetError {
    AnetError::UnknownField {
        resource: M::RESOURCE_NAME,
        field: field.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Validation schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required,
    Email,
    MaxLength(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub field: &'static str,
    pub label: &'static str,
    pub rule: Rule,
}

impl FieldRule {
    pub const fn required(field: &'static str, label: &'static str) -> Self {
        Self {
            field,
            label,
            rule: Rule::Required,
        }
    }

    pub const fn email(field: &'static str, label: &'static str) -> Self {
        Self {
            field,
            label,
            rule: Rule::Email,
        }
    }

    pub const fn max_length(field: &'static str, label: &'static str, max: usize) -> Self {
        Self {
            field,
            label,
            rule: Rule::MaxLength(max),
        }
    }

    fn check(&self, value: &FieldValue, policy: Option<&EmailPolicy>) -> Option<String> {
        match self.rule {
            Rule::Required => value
                .is_blank()
                .then(|| format!("{} is required", self.label)),
            Rule::MaxLength(max) => {
                let len = value.as_text().map(|s| s.chars().count()).unwrap_or(0);
                (len > max).then(|| format!("{} must be at most {max} characters", self.label))
            }
            Rule::Email => {
                let text = value.as_text()?;
                match policy {
                    Some(policy) => policy.handle_email_validation(text, true).message,
                    None => (!text.contains('@'))
                        .then(|| "Please provide a valid email address".to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

pub trait Model {
    const RESOURCE_NAME: &'static str;
    const LIST_NAME: &'static str;
    const ROUTE: &'static str;

    fn uuid(&self) -> Option<&str>;

    fn display_name(&self) -> String;

    fn validation_schema() -> &'static [FieldRule];

    /// Read a form field by id. `None` for ids the model does not have.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Write a form field by id from its textual input.
    fn set_field(&mut self, name: &str, value: &str) -> Result<()>;

    fn path_for(&self) -> Option<String> {
        self.uuid().map(|uuid| paths::view_path(Self::ROUTE, uuid))
    }

    fn path_for_edit(&self) -> Option<String> {
        self.uuid().map(|uuid| paths::edit_path(Self::ROUTE, uuid))
    }

    fn path_for_new() -> String {
        paths::new_path(Self::ROUTE)
    }

    fn validate(&self) -> Vec<FieldError> {
        self.validate_with(None)
    }

    fn validate_with(&self, policy: Option<&EmailPolicy>) -> Vec<FieldError> {
        Self::validation_schema()
            .iter()
            .filter_map(|rule| {
                let value = self.field(rule.field).unwrap_or(FieldValue::Empty);
                rule.check(&value, policy).map(|message| FieldError {
                    field: rule.field.to_string(),
                    message,
                })
            })
            .collect()
    }

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One page of a paginated list query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub page_num: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}

impl<T> Page<T> {
    pub fn num_pages(&self) -> i64 {
        if self.page_size <= 0 {
            1
        } else {
            (self.total_count + self.page_size - 1) / self.page_size
        }
    }

    /// 1-based page number for display.
    pub fn display_page(&self) -> i64 {
        self.page_num + 1
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        let page: Page<()> = Page {
            page_num: 0,
            page_size: 10,
            total_count: 21,
            list: vec![],
        };
        assert_eq!(page.num_pages(), 3);
        assert_eq!(page.display_page(), 1);
    }

    #[test]
    fn page_size_zero_is_single_page() {
        let page: Page<()> = Page {
            page_num: 0,
            page_size: 0,
            total_count: 500,
            list: vec![],
        };
        assert_eq!(page.num_pages(), 1);
    }

    #[test]
    fn page_deserializes_with_missing_fields() {
        let page: Page<Location> = serde_json::from_str(r#"{"list":[{"uuid":"l1","name":"Kabul"}]}"#).unwrap();
        assert_eq!(page.list.len(), 1);
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn field_value_blankness() {
        assert!(FieldValue::Empty.is_blank());
        assert!(FieldValue::text("  ").is_blank());
        assert!(FieldValue::Count(0).is_blank());
        assert!(!FieldValue::Count(2).is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }

    #[test]
    fn rules_produce_messages() {
        let required = FieldRule::required("name", "Name");
        assert_eq!(
            required.check(&FieldValue::Empty, None).as_deref(),
            Some("Name is required")
        );
        let max = FieldRule::max_length("description", "Description", 3);
        assert!(max.check(&FieldValue::text("abcd"), None).is_some());
        assert!(max.check(&FieldValue::text("abc"), None).is_none());
        let email = FieldRule::email("emailAddress", "Email");
        assert!(email.check(&FieldValue::Empty, None).is_none());
        assert!(email.check(&FieldValue::text("nope"), None).is_some());
    }
}
