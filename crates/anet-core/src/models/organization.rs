use crate::error::{AnetError, Result};
use crate::models::{
    get_reference, optional, unknown_field, FieldRule, FieldValue, Model, Position, Reference,
    Task,
};
use crate::paths;
use crate::settings::{OrgDictionary, Settings};
use crate::types::{OrganizationType, Status};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ApprovalStep
// ---------------------------------------------------------------------------

/// One stage of an organization's report approval chain. Step order is the
/// approval order; approver order only matters for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApprovalStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    pub approvers: Vec<Position>,
}

impl ApprovalStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: None,
            name: name.into(),
            approvers: Vec::new(),
        }
    }

    pub fn has_approver(&self, uuid: &str) -> bool {
        self.approvers.iter().any(|p| p.uuid.as_deref() == Some(uuid))
    }
}

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub short_name: String,
    pub long_name: String,
    pub identification_code: Option<String>,
    #[serde(rename = "type")]
    pub org_type: Option<OrganizationType>,
    pub status: Status,
    pub parent_org: Option<Box<Organization>>,
    pub children_orgs: Vec<Organization>,
    pub approval_steps: Vec<ApprovalStep>,
    pub positions: Vec<Position>,
    pub tasks: Vec<Task>,
}

const ORGANIZATION_SCHEMA: &[FieldRule] = &[
    FieldRule::required("shortName", "Name"),
    FieldRule::required("type", "Organization type"),
    FieldRule::required("status", "Status"),
];

impl Organization {
    pub fn new(org_type: OrganizationType) -> Self {
        Self {
            org_type: Some(org_type),
            ..Self::default()
        }
    }

    pub fn is_advisor_org(&self) -> bool {
        self.org_type == Some(OrganizationType::AdvisorOrg)
    }

    pub fn is_principal_org(&self) -> bool {
        self.org_type == Some(OrganizationType::PrincipalOrg)
    }

    /// Display name for an organization type. Anything that is not a
    /// principal organization, including an unset type, is treated as an
    /// advisor organization.
    pub fn human_name_of_type(org_type: Option<OrganizationType>, settings: &Settings) -> &str {
        match org_type {
            Some(OrganizationType::PrincipalOrg) => &settings.fields.principal.org.name,
            _ => &settings.fields.advisor.org.name,
        }
    }

    pub fn type_name<'a>(&self, settings: &'a Settings) -> &'a str {
        Self::human_name_of_type(self.org_type, settings)
    }

    /// The dictionary section the organization form draws labels from.
    pub fn dictionary<'a>(&self, settings: &'a Settings) -> &'a OrgDictionary {
        if self.is_principal_org() {
            &settings.fields.principal.org
        } else {
            &settings.fields.advisor.org
        }
    }

    // -----------------------------------------------------------------------
    // Approval steps
    // -----------------------------------------------------------------------

    pub fn add_approval_step(&mut self) -> usize {
        self.approval_steps.push(ApprovalStep::default());
        self.approval_steps.len() - 1
    }

    pub fn remove_approval_step(&mut self, index: usize) -> Result<ApprovalStep> {
        if index >= self.approval_steps.len() {
            return Err(AnetError::ApprovalStepNotFound(index));
        }
        Ok(self.approval_steps.remove(index))
    }

    pub fn set_step_name(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let step = self.step_mut(index)?;
        step.name = name.into();
        Ok(())
    }

    /// Append `position` to step `index`. Positions without a uuid and
    /// positions already in the step are ignored; returns whether the step
    /// changed.
    pub fn add_approver(&mut self, index: usize, position: Position) -> Result<bool> {
        let step = self.step_mut(index)?;
        let Some(uuid) = position.uuid.as_deref() else {
            return Ok(false);
        };
        if step.has_approver(uuid) {
            return Ok(false);
        }
        step.approvers.push(position);
        Ok(true)
    }

    pub fn remove_approver(&mut self, index: usize, approver_uuid: &str) -> Result<bool> {
        let step = self.step_mut(index)?;
        match step
            .approvers
            .iter()
            .position(|p| p.uuid.as_deref() == Some(approver_uuid))
        {
            Some(i) => {
                step.approvers.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn step_mut(&mut self, index: usize) -> Result<&mut ApprovalStep> {
        self.approval_steps
            .get_mut(index)
            .ok_or(AnetError::ApprovalStepNotFound(index))
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Mutation payload: children and positions are dropped, references are
    /// reduced to their uuid, step order is kept.
    pub fn to_input(&self) -> OrganizationInput {
        OrganizationInput {
            uuid: self.uuid.clone(),
            short_name: self.short_name.clone(),
            long_name: self.long_name.clone(),
            identification_code: self.identification_code.clone(),
            org_type: self.org_type,
            status: self.status,
            parent_org: self.parent_org.as_deref().and_then(get_reference),
            approval_steps: self
                .approval_steps
                .iter()
                .map(|step| ApprovalStepInput {
                    uuid: step.uuid.clone(),
                    name: step.name.clone(),
                    approvers: step.approvers.iter().filter_map(get_reference).collect(),
                })
                .collect(),
            tasks: self.tasks.iter().filter_map(get_reference).collect(),
        }
    }
}

impl Model for Organization {
    const RESOURCE_NAME: &'static str = "Organization";
    const LIST_NAME: &'static str = "organizationList";
    const ROUTE: &'static str = paths::ORGANIZATIONS_ROUTE;

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn display_name(&self) -> String {
        [
            Some(self.short_name.as_str()),
            Some(self.long_name.as_str()),
            self.identification_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
    }

    fn validation_schema() -> &'static [FieldRule] {
        ORGANIZATION_SCHEMA
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "uuid" => FieldValue::opt_text(self.uuid.as_deref()),
            "shortName" => FieldValue::text(&self.short_name),
            "longName" => FieldValue::text(&self.long_name),
            "identificationCode" => FieldValue::opt_text(self.identification_code.as_deref()),
            "type" => FieldValue::opt_text(self.org_type.map(OrganizationType::as_str)),
            "status" => FieldValue::text(self.status.as_str()),
            "parentOrg" => self
                .parent_org
                .as_deref()
                .map(|p| FieldValue::text(&p.display_name()))
                .unwrap_or(FieldValue::Empty),
            "approvalSteps" => FieldValue::Count(self.approval_steps.len()),
            "tasks" => FieldValue::Count(self.tasks.len()),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "shortName" => self.short_name = value.to_string(),
            "longName" => self.long_name = value.to_string(),
            "identificationCode" => self.identification_code = optional(value),
            "type" => {
                self.org_type = match optional(value) {
                    Some(v) => Some(v.trim().parse()?),
                    None => None,
                }
            }
            "status" => self.status = value.trim().parse()?,
            _ => return Err(unknown_field::<Self>(name)),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Mutation input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStepInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    pub approvers: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub short_name: String,
    pub long_name: String,
    pub identification_code: Option<String>,
    #[serde(rename = "type")]
    pub org_type: Option<OrganizationType>,
    pub status: Status,
    pub parent_org: Option<Reference>,
    pub approval_steps: Vec<ApprovalStepInput>,
    pub tasks: Vec<Reference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(uuid: &str, name: &str) -> Position {
        Position {
            uuid: Some(uuid.to_string()),
            name: name.to_string(),
            ..Position::default()
        }
    }

    #[test]
    fn partial_record_merges_over_defaults() {
        let org: Organization =
            serde_json::from_str(r#"{"uuid":"o1","shortName":"EF1","type":"ADVISOR_ORG"}"#).unwrap();
        assert_eq!(org.short_name, "EF1");
        assert!(org.is_advisor_org());
        assert!(org.approval_steps.is_empty());
        assert_eq!(org.status, Status::Active);
        assert!(org.parent_org.is_none());
    }

    #[test]
    fn display_name_fallback_order() {
        let mut org = Organization {
            identification_code: Some("UIC-9".to_string()),
            ..Organization::default()
        };
        assert_eq!(org.display_name(), "UIC-9");
        org.long_name = "Long".to_string();
        assert_eq!(org.display_name(), "Long");
        org.short_name = "Short".to_string();
        assert_eq!(org.display_name(), "Short");
        assert_eq!(Organization::default().display_name(), "");
    }

    #[test]
    fn human_name_of_type_falls_back_to_advisor() {
        let settings = Settings::default();
        let principal =
            Organization::human_name_of_type(Some(OrganizationType::PrincipalOrg), &settings);
        let advisor =
            Organization::human_name_of_type(Some(OrganizationType::AdvisorOrg), &settings);
        assert_eq!(principal, settings.fields.principal.org.name);
        assert_eq!(advisor, settings.fields.advisor.org.name);
        assert_ne!(principal, advisor);
        assert_eq!(Organization::human_name_of_type(None, &settings), advisor);
    }

    #[test]
    fn paths_derive_from_uuid() {
        let org = Organization {
            uuid: Some("o-42".to_string()),
            ..Organization::default()
        };
        assert_eq!(org.path_for().as_deref(), Some("/organizations/o-42"));
        assert_eq!(org.path_for_edit().as_deref(), Some("/organizations/o-42/edit"));
        assert_eq!(Organization::default().path_for(), None);
        assert_eq!(Organization::path_for_new(), "/organizations/new");
    }

    #[test]
    fn approval_steps_keep_order_and_dedupe_approvers() {
        let mut org = Organization::new(OrganizationType::AdvisorOrg);
        let first = org.add_approval_step();
        let second = org.add_approval_step();
        org.set_step_name(first, "Battalion").unwrap();
        org.set_step_name(second, "Brigade").unwrap();

        assert!(org.add_approver(first, position("p1", "EF1 Lead")).unwrap());
        assert!(!org.add_approver(first, position("p1", "EF1 Lead")).unwrap());
        assert!(!org.add_approver(first, Position::default()).unwrap());
        assert!(org.add_approver(first, position("p2", "EF1 Deputy")).unwrap());

        let names: Vec<_> = org.approval_steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Battalion", "Brigade"]);
        let approvers: Vec<_> = org.approval_steps[first]
            .approvers
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(approvers, ["EF1 Lead", "EF1 Deputy"]);

        assert!(org.remove_approver(first, "p1").unwrap());
        assert!(!org.remove_approver(first, "p1").unwrap());
        let removed = org.remove_approval_step(first).unwrap();
        assert_eq!(removed.name, "Battalion");
        assert_eq!(org.approval_steps[0].name, "Brigade");
    }

    #[test]
    fn approval_step_index_out_of_range() {
        let mut org = Organization::default();
        assert!(matches!(
            org.set_step_name(3, "x"),
            Err(AnetError::ApprovalStepNotFound(3))
        ));
        assert!(org.remove_approval_step(0).is_err());
    }

    #[test]
    fn to_input_strips_children_and_reduces_references() {
        let mut org = Organization::new(OrganizationType::AdvisorOrg);
        org.short_name = "EF1.1".to_string();
        org.parent_org = Some(Box::new(Organization {
            uuid: Some("parent".to_string()),
            short_name: "EF1".to_string(),
            ..Organization::default()
        }));
        org.children_orgs.push(Organization::default());
        org.positions.push(position("p9", "Someone"));
        let step = org.add_approval_step();
        org.add_approver(step, position("p1", "Lead")).unwrap();

        let input = org.to_input();
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["shortName"], "EF1.1");
        assert_eq!(json["type"], "ADVISOR_ORG");
        assert_eq!(json["parentOrg"], serde_json::json!({"uuid": "parent"}));
        assert_eq!(
            json["approvalSteps"][0]["approvers"],
            serde_json::json!([{"uuid": "p1"}])
        );
        assert!(json.get("childrenOrgs").is_none());
        assert!(json.get("positions").is_none());
        assert!(json.get("uuid").is_none());
    }

    #[test]
    fn set_field_parses_enums_and_rejects_unknown() {
        let mut org = Organization::default();
        org.set_field("type", "PRINCIPAL_ORG").unwrap();
        assert!(org.is_principal_org());
        org.set_field("type", "").unwrap();
        assert_eq!(org.org_type, None);
        org.set_field("status", "INACTIVE").unwrap();
        assert_eq!(org.status, Status::Inactive);
        assert!(org.set_field("type", "BOGUS").is_err());
        assert!(matches!(
            org.set_field("nope", "x"),
            Err(AnetError::UnknownField { .. })
        ));
    }

    #[test]
    fn validation_requires_name_and_type() {
        let org = Organization::default();
        let errors = org.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["shortName", "type"]);

        let mut org = Organization::new(OrganizationType::AdvisorOrg);
        org.short_name = "EF1.1".to_string();
        assert!(org.is_valid());
    }

    #[test]
    fn dictionary_follows_type() {
        let settings = Settings::default();
        let org = Organization::new(OrganizationType::PrincipalOrg);
        assert!(org.dictionary(&settings).identification_code.is_none());
        let org = Organization::new(OrganizationType::AdvisorOrg);
        assert!(org.dictionary(&settings).identification_code.is_some());
    }
}
