use crate::error::{AnetError, Result};
use crate::models::{
    instant, optional, unknown_field, ApprovalStep, FieldRule, FieldValue, Location, Model, Person, Task,
};
use crate::paths;
use crate::types::{PersonRole, ReportState};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A person attending an engagement; one attendee per side is primary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(flatten)]
    pub person: Person,
    #[serde(default)]
    pub primary: bool,
}

/// One recorded approve/reject action on a report's approval chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportApprovalAction {
    pub step: Option<ApprovalStep>,
    pub person: Option<Person>,
    #[serde(rename = "type")]
    pub action_type: Option<String>,
    #[serde(deserialize_with = "instant::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub intent: String,
    pub state: ReportState,
    #[serde(deserialize_with = "instant::deserialize_opt")]
    pub engagement_date: Option<DateTime<Utc>>,
    pub location: Option<Location>,
    pub author: Option<Box<Person>>,
    pub attendees: Vec<Attendee>,
    pub tasks: Vec<Task>,
    pub key_outcomes: Option<String>,
    pub next_steps: Option<String>,
    pub report_text: Option<String>,
    pub cancelled_reason: Option<String>,
    pub approval_status: Vec<ReportApprovalAction>,
}

const REPORT_SCHEMA: &[FieldRule] = &[
    FieldRule::required("intent", "Meeting goal (purpose)"),
    FieldRule::required("engagementDate", "Engagement date"),
    FieldRule::max_length("keyOutcomes", "Key outcomes", 250),
    FieldRule::max_length("nextSteps", "Next steps", 250),
];

impl Report {
    pub fn is_draft(&self) -> bool {
        self.state == ReportState::Draft
    }

    pub fn is_pending_approval(&self) -> bool {
        self.state == ReportState::PendingApproval
    }

    pub fn is_approved(&self) -> bool {
        self.state == ReportState::Approved
    }

    pub fn is_published(&self) -> bool {
        self.state == ReportState::Published
    }

    pub fn is_rejected(&self) -> bool {
        self.state == ReportState::Rejected
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == ReportState::Cancelled
    }

    pub fn is_future(&self) -> bool {
        self.state == ReportState::Future
    }

    /// Whether the edit controls are offered for this report.
    pub fn is_editable(&self) -> bool {
        matches!(
            self.state,
            ReportState::Draft
                | ReportState::Rejected
                | ReportState::Future
                | ReportState::PendingApproval
        )
    }

    pub fn primary_attendee(&self, role: PersonRole) -> Option<&Person> {
        self.attendees
            .iter()
            .find(|a| a.primary && a.person.role == Some(role))
            .map(|a| &a.person)
    }

    /// Mark `uuid` as the primary attendee for its side, clearing the flag on
    /// the other attendees of the same role.
    pub fn set_primary_attendee(&mut self, uuid: &str) -> bool {
        let Some(role) = self
            .attendees
            .iter()
            .find(|a| a.person.uuid.as_deref() == Some(uuid))
            .map(|a| a.person.role)
        else {
            return false;
        };
        for attendee in self.attendees.iter_mut().filter(|a| a.person.role == role) {
            attendee.primary = attendee.person.uuid.as_deref() == Some(uuid);
        }
        true
    }

    /// The most recent approval action, if any.
    pub fn latest_approval_action(&self) -> Option<&ReportApprovalAction> {
        self.approval_status.last()
    }
}

fn parse_date(field: &str, value: &str) -> Result<Option<DateTime<Utc>>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| AnetError::InvalidFieldValue {
            field: field.to_string(),
            reason: format!("'{trimmed}' is not a date"),
        })
}

impl Model for Report {
    const RESOURCE_NAME: &'static str = "Report";
    const LIST_NAME: &'static str = "reportList";
    const ROUTE: &'static str = paths::REPORTS_ROUTE;

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn display_name(&self) -> String {
        self.intent.clone()
    }

    fn validation_schema() -> &'static [FieldRule] {
        REPORT_SCHEMA
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "uuid" => FieldValue::opt_text(self.uuid.as_deref()),
            "intent" => FieldValue::text(&self.intent),
            "state" => FieldValue::text(self.state.as_str()),
            "engagementDate" => self
                .engagement_date
                .map(|d| FieldValue::Text(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(FieldValue::Empty),
            "keyOutcomes" => FieldValue::opt_text(self.key_outcomes.as_deref()),
            "nextSteps" => FieldValue::opt_text(self.next_steps.as_deref()),
            "reportText" => FieldValue::opt_text(self.report_text.as_deref()),
            "cancelledReason" => FieldValue::opt_text(self.cancelled_reason.as_deref()),
            "attendees" => FieldValue::Count(self.attendees.len()),
            "tasks" => FieldValue::Count(self.tasks.len()),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "intent" => self.intent = value.to_string(),
            "engagementDate" => self.engagement_date = parse_date(name, value)?,
            "keyOutcomes" => self.key_outcomes = optional(value),
            "nextSteps" => self.next_steps = optional(value),
            "reportText" => self.report_text = optional(value),
            "cancelledReason" => self.cancelled_reason = optional(value),
            _ => return Err(unknown_field::<Self>(name)),
        }
        Ok(())
    }
}
