use crate::error::Result;
use crate::models::{
    get_reference, optional, unknown_field, FieldRule, FieldValue, Location, Model, Organization,
    Person, Reference,
};
use crate::paths;
use crate::types::{OrganizationType, PositionType, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub position_type: Option<PositionType>,
    pub status: Status,
    pub organization: Option<Box<Organization>>,
    pub person: Option<Box<Person>>,
    pub location: Option<Location>,
    pub associated_positions: Vec<Position>,
}

const POSITION_SCHEMA: &[FieldRule] = &[
    FieldRule::required("name", "Position Name"),
    FieldRule::required("type", "Type"),
    FieldRule::required("organization", "Organization"),
];

impl Position {
    pub fn is_principal(&self) -> bool {
        self.position_type == Some(PositionType::Principal)
    }

    pub fn is_advisor_side(&self) -> bool {
        self.position_type
            .is_some_and(|t| PositionType::advisor_side().contains(&t))
    }

    /// Positions on the other side of an advising relationship.
    pub fn relationship_position_type(&self) -> PositionType {
        if self.is_principal() {
            PositionType::Advisor
        } else {
            PositionType::Principal
        }
    }

    /// Types a position may take inside `org`: principal organizations only
    /// hold principal positions.
    pub fn allowed_types(org: Option<&Organization>) -> &'static [PositionType] {
        match org.and_then(|o| o.org_type) {
            Some(OrganizationType::PrincipalOrg) => &[PositionType::Principal],
            Some(OrganizationType::AdvisorOrg) => PositionType::advisor_side(),
            None => &[],
        }
    }

    /// Setting the organization re-derives the type when the current one is
    /// not allowed there.
    pub fn set_organization(&mut self, org: Option<Organization>) {
        self.organization = org.map(Box::new);
        let allowed = Self::allowed_types(self.organization.as_deref());
        if !self.position_type.is_some_and(|t| allowed.contains(&t)) {
            self.position_type = allowed.first().copied();
        }
    }

    /// `person - name - code`, skipping the parts that are missing.
    pub fn autocomplete_label(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(person) = self.person.as_deref() {
            if !person.name.is_empty() {
                parts.push(&person.name);
            }
        }
        if !self.name.is_empty() {
            parts.push(&self.name);
        }
        if let Some(code) = self.code.as_deref().filter(|c| !c.is_empty()) {
            parts.push(code);
        }
        parts.join(" - ")
    }

    pub fn add_associated_position(&mut self, position: Position) -> bool {
        let Some(uuid) = position.uuid.as_deref() else {
            return false;
        };
        if self
            .associated_positions
            .iter()
            .any(|p| p.uuid.as_deref() == Some(uuid))
        {
            return false;
        }
        self.associated_positions.push(position);
        true
    }

    pub fn remove_associated_position(&mut self, uuid: &str) -> bool {
        let before = self.associated_positions.len();
        self.associated_positions
            .retain(|p| p.uuid.as_deref() != Some(uuid));
        self.associated_positions.len() != before
    }

    pub fn associated_references(&self) -> Vec<Reference> {
        self.associated_positions
            .iter()
            .filter_map(get_reference)
            .collect()
    }
}

impl Model for Position {
    const RESOURCE_NAME: &'static str = "Position";
    const LIST_NAME: &'static str = "positionList";
    const ROUTE: &'static str = paths::POSITIONS_ROUTE;

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn validation_schema() -> &'static [FieldRule] {
        POSITION_SCHEMA
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "uuid" => FieldValue::opt_text(self.uuid.as_deref()),
            "name" => FieldValue::text(&self.name),
            "code" => FieldValue::opt_text(self.code.as_deref()),
            "type" => FieldValue::opt_text(self.position_type.map(PositionType::as_str)),
            "status" => FieldValue::text(self.status.as_str()),
            "organization" => self
                .organization
                .as_deref()
                .map(|o| FieldValue::text(&o.display_name()))
                .unwrap_or(FieldValue::Empty),
            "person" => self
                .person
                .as_deref()
                .map(|p| FieldValue::text(&p.display_name()))
                .unwrap_or(FieldValue::Empty),
            "location" => self
                .location
                .as_ref()
                .map(|l| FieldValue::text(&l.display_name()))
                .unwrap_or(FieldValue::Empty),
            "associatedPositions" => FieldValue::Count(self.associated_positions.len()),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "name" => self.name = value.to_string(),
            "code" => self.code = optional(value),
            "type" => {
                self.position_type = match optional(value) {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(uuid: &str) -> Position {
        Position {
            uuid: Some(uuid.to_string()),
            name: format!("Position {uuid}"),
            ..Position::default()
        }
    }

    #[test]
    fn autocomplete_label_joins_present_parts() {
        let mut p = Position {
            name: "EF2 Advisor".to_string(),
            code: Some("B-12".to_string()),
            ..Position::default()
        };
        assert_eq!(p.autocomplete_label(), "EF2 Advisor - B-12");
        p.person = Some(Box::new(Person {
            name: "JACKSON, Jack".to_string(),
            ..Person::default()
        }));
        assert_eq!(p.autocomplete_label(), "JACKSON, Jack - EF2 Advisor - B-12");
        p.code = None;
        assert_eq!(p.autocomplete_label(), "JACKSON, Jack - EF2 Advisor");
    }

    #[test]
    fn relationship_type_flips_sides() {
        let mut p = Position::default();
        p.position_type = Some(PositionType::Principal);
        assert_eq!(p.relationship_position_type(), PositionType::Advisor);
        p.position_type = Some(PositionType::SuperUser);
        assert_eq!(p.relationship_position_type(), PositionType::Principal);
    }

    #[test]
    fn associated_positions_are_unique() {
        let mut p = pos("a");
        assert!(p.add_associated_position(pos("b")));
        assert!(!p.add_associated_position(pos("b")));
        assert!(!p.add_associated_position(Position::default()));
        assert!(p.add_associated_position(pos("c")));
        assert_eq!(p.associated_references(), vec![Reference::new("b"), Reference::new("c")]);
        assert!(p.remove_associated_position("b"));
        assert!(!p.remove_associated_position("b"));
        assert_eq!(p.associated_positions.len(), 1);
    }

    #[test]
    fn organization_constrains_type() {
        let mut p = Position::default();
        p.position_type = Some(PositionType::Administrator);
        p.set_organization(Some(Organization::new(OrganizationType::PrincipalOrg)));
        assert_eq!(p.position_type, Some(PositionType::Principal));

        p.set_organization(Some(Organization::new(OrganizationType::AdvisorOrg)));
        assert_eq!(p.position_type, Some(PositionType::Advisor));

        p.position_type = Some(PositionType::SuperUser);
        p.set_organization(Some(Organization::new(OrganizationType::AdvisorOrg)));
        assert_eq!(p.position_type, Some(PositionType::SuperUser));
    }

    #[test]
    fn validation_requires_organization() {
        let mut p = Position {
            name: "Deputy".to_string(),
            position_type: Some(PositionType::Advisor),
            ..Position::default()
        };
        let errors = p.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "organization");
        p.organization = Some(Box::new(Organization {
            short_name: "EF2".to_string(),
            ..Organization::default()
        }));
        assert!(p.is_valid());
    }

    #[test]
    fn path_uses_positions_route() {
        assert_eq!(pos("x").path_for().as_deref(), Some("/positions/x"));
    }
}
