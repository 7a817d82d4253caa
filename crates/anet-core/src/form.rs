//! Form bindings over a [`Model`].
//!
//! A [`Form`] owns the model being edited and tracks which fields the user
//! touched, the validation errors for those fields, and the submit control
//! state. [`render_field`] turns a field plus its optional dictionary entry
//! into a [`FieldView`]; fields without a dictionary entry are not shown.

use crate::email::EmailPolicy;
use crate::error::Result;
use crate::models::{FieldError, Model, Rule};
use crate::settings::DictField;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_SUBMIT_TEXT: &str = "Save";

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Form<M> {
    model: M,
    initial: M,
    policy: Option<EmailPolicy>,
    touched: BTreeSet<String>,
    errors: BTreeMap<String, String>,
    dirty: bool,
    submitting: bool,
    read_only: bool,
    banner: Option<String>,
    submit_text: String,
}

impl<M: Model + Clone> Form<M> {
    pub fn new(model: M) -> Self {
        Self {
            initial: model.clone(),
            model,
            policy: None,
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
            dirty: false,
            submitting: false,
            read_only: false,
            banner: None,
            submit_text: DEFAULT_SUBMIT_TEXT.to_string(),
        }
    }

    /// A form that only displays its model; every field is disabled and
    /// there is no submit control.
    pub fn read_only(model: M) -> Self {
        Self {
            read_only: true,
            ..Self::new(model)
        }
    }

    /// Validate email fields against `policy` instead of a bare `@` check.
    pub fn with_email_policy(mut self, policy: EmailPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_submit_text(mut self, text: impl Into<String>) -> Self {
        self.submit_text = text.into();
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access for edits that are not single-field writes, such as
    /// approval-step changes. Marks the form dirty.
    pub fn model_mut(&mut self) -> &mut M {
        self.dirty = true;
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Write one field from its textual input and re-validate touched fields.
    pub fn set(&mut self, id: &str, value: &str) -> Result<()> {
        self.model.set_field(id, value)?;
        self.dirty = true;
        self.touched.insert(id.to_string());
        self.revalidate();
        Ok(())
    }

    fn revalidate(&mut self) {
        self.errors = self
            .model
            .validate_with(self.policy.as_ref())
            .into_iter()
            .filter(|e| self.touched.contains(&e.field))
            .fold(BTreeMap::new(), |mut acc, e| {
                acc.entry(e.field).or_insert(e.message);
                acc
            });
    }

    /// Errors for the fields the user has touched.
    pub fn errors(&self) -> Vec<FieldError> {
        self.errors
            .iter()
            .map(|(field, message)| FieldError {
                field: field.clone(),
                message: message.clone(),
            })
            .collect()
    }

    pub fn error_for(&self, id: &str) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.model.validate_with(self.policy.as_ref()).is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn submit_text(&self) -> Option<&str> {
        (!self.read_only).then_some(self.submit_text.as_str())
    }

    pub fn submit_disabled(&self) -> bool {
        self.read_only || self.submitting || !self.is_valid()
    }

    /// Message banner from the last failed submit.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Start a submit: every schema field counts as touched so all errors
    /// surface. Returns `false` (and leaves the control enabled) when the
    /// model does not validate or a submit is already running.
    pub fn begin_submit(&mut self) -> bool {
        if self.read_only || self.submitting {
            return false;
        }
        for rule in M::validation_schema() {
            self.touched.insert(rule.field.to_string());
        }
        self.revalidate();
        if !self.errors.is_empty() {
            return false;
        }
        self.banner = None;
        self.submitting = true;
        true
    }

    /// The server rejected the submit: re-enable the control and keep the
    /// message for the banner.
    pub fn fail_submit(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.banner = Some(message.into());
    }

    /// The server accepted the submit; the current model becomes the clean
    /// baseline.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
        self.dirty = false;
        self.initial = self.model.clone();
    }

    /// Replace the model with a server response after a successful save.
    pub fn finish_submit_with(&mut self, saved: M) {
        self.model = saved;
        self.finish_submit();
    }

    /// Discard edits back to the last clean baseline.
    pub fn reset(&mut self) {
        self.model = self.initial.clone();
        self.touched.clear();
        self.errors.clear();
        self.dirty = false;
        self.submitting = false;
        self.banner = None;
    }
}

// ---------------------------------------------------------------------------
// Field rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub value: String,
    pub disabled: bool,
    pub required: bool,
    pub error: Option<String>,
}

fn humanize(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 4);
    for (i, c) in id.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// View of field `id` with an explicit label.
pub fn field_view<M: Model + Clone>(id: &str, label: &str, form: &Form<M>) -> FieldView {
    let required = M::validation_schema()
        .iter()
        .any(|r| r.field == id && r.rule == Rule::Required);
    FieldView {
        id: id.to_string(),
        label: label.to_string(),
        placeholder: None,
        value: form
            .model()
            .field(id)
            .map(|v| v.display())
            .unwrap_or_default(),
        disabled: form.is_read_only() || form.is_submitting(),
        required,
        error: form.error_for(id).map(str::to_string),
    }
}

/// View of a dictionary-configured field. `None` when the dictionary has no
/// entry for it, so the field is left out of the form.
pub fn render_field<M: Model + Clone>(
    id: &str,
    dict: Option<&DictField>,
    form: &Form<M>,
) -> Option<FieldView> {
    let dict = dict.filter(|d| !d.is_empty())?;
    let label = dict
        .label
        .clone()
        .unwrap_or_else(|| humanize(id));
    let mut view = field_view(id, &label, form);
    view.placeholder = dict.placeholder.clone();
    Some(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorizationGroup, Organization, Person};
    use crate::settings::Settings;
    use crate::types::{OrganizationType, PersonRole};

    #[test]
    fn missing_or_empty_dictionary_hides_field() {
        let form = Form::new(Organization::new(OrganizationType::PrincipalOrg));
        let settings = Settings::default();
        let dict = form.model().dictionary(&settings);
        assert!(render_field("identificationCode", dict.identification_code.as_ref(), &form).is_none());
        assert!(render_field("longName", Some(&DictField::default()), &form).is_none());

        let view = render_field("longName", dict.long_name.as_ref(), &form).unwrap();
        assert_eq!(view.label, "Official Organization Name");
        assert_eq!(view.placeholder.as_deref(), Some("e.g. Afghan Ministry of Defense"));
        assert!(!view.required);
    }

    #[test]
    fn placeholder_only_entry_gets_humanized_label() {
        let form = Form::new(Organization::default());
        let dict = DictField {
            label: None,
            placeholder: Some("code".to_string()),
        };
        let view = render_field("identificationCode", Some(&dict), &form).unwrap();
        assert_eq!(view.label, "Identification code");
    }

    #[test]
    fn errors_only_for_touched_fields() {
        let mut form = Form::new(AuthorizationGroup::default());
        assert!(form.errors().is_empty());
        assert!(form.submit_disabled());

        form.set("name", "Group A").unwrap();
        assert!(form.errors().is_empty());
        form.set("description", "").unwrap();
        assert_eq!(form.error_for("description"), Some("Description is required"));
        assert!(form.is_dirty());

        form.set("description", "x".repeat(251).as_str()).unwrap();
        assert_eq!(
            form.error_for("description"),
            Some("Description must be at most 250 characters")
        );
        form.set("description", "ok").unwrap();
        assert!(form.errors().is_empty());
        assert!(form.is_valid());
    }

    #[test]
    fn submit_lifecycle() {
        let mut form = Form::new(AuthorizationGroup::default());
        assert!(!form.begin_submit());
        assert_eq!(form.errors().len(), 2);

        form.set("name", "Group A").unwrap();
        form.set("description", "Everybody").unwrap();
        assert!(form.begin_submit());
        assert!(form.is_submitting());
        assert!(form.submit_disabled());
        assert!(!form.begin_submit());
        let view = field_view("name", "Name", &form);
        assert!(view.disabled);
        assert!(view.required);

        form.fail_submit("Forbidden: nope");
        assert!(!form.is_submitting());
        assert_eq!(form.banner(), Some("Forbidden: nope"));
        assert!(!form.submit_disabled());

        assert!(form.begin_submit());
        assert!(form.banner().is_none());
        form.finish_submit();
        assert!(!form.is_dirty());
        form.set("name", "Group B").unwrap();
        form.reset();
        assert_eq!(form.model().name, "Group A");
    }

    #[test]
    fn email_policy_applies_to_person_form() {
        let policy = EmailPolicy::new(["nato.int"], None);
        let mut person = Person::default();
        person.role = Some(PersonRole::Advisor);
        let mut form = Form::new(person).with_email_policy(policy);
        form.set("name", "Erin").unwrap();
        form.set("emailAddress", "erin@gmail.com").unwrap();
        assert!(form.error_for("emailAddress").is_some());
        form.set("emailAddress", "erin@nato.int").unwrap();
        assert!(form.is_valid());
    }

    #[test]
    fn read_only_form_has_no_submit() {
        let form = Form::read_only(Organization::default()).with_submit_text("Create");
        assert!(form.submit_text().is_none());
        assert!(field_view("shortName", "Name", &form).disabled);
        let form = Form::new(Organization::default()).with_submit_text("Create");
        assert_eq!(form.submit_text(), Some("Create"));
    }

    #[test]
    fn unknown_field_is_an_error() {
        let mut form = Form::new(Organization::default());
        assert!(form.set("nope", "x").is_err());
        assert!(!form.is_dirty());
    }
}
