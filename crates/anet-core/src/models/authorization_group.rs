use crate::error::Result;
use crate::models::{get_reference, unknown_field, FieldRule, FieldValue, Model, Position, Reference};
use crate::paths;
use crate::types::Status;
use serde::{Deserialize, Serialize};

pub const DESCRIPTION_MAX_CHARS: usize = 250;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizationGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    pub description: String,
    pub status: Status,
    pub positions: Vec<Position>,
}

const AUTHORIZATION_GROUP_SCHEMA: &[FieldRule] = &[
    FieldRule::required("name", "Name"),
    FieldRule::required("description", "Description"),
    FieldRule::max_length("description", "Description", DESCRIPTION_MAX_CHARS),
    FieldRule::required("status", "Status"),
];

impl AuthorizationGroup {
    /// Characters remaining before the description hits its limit. Negative
    /// once the limit is exceeded.
    pub fn description_chars_left(&self) -> i64 {
        DESCRIPTION_MAX_CHARS as i64 - self.description.chars().count() as i64
    }

    pub fn set_positions(&mut self, positions: Vec<Position>) {
        let mut unique: Vec<Position> = Vec::with_capacity(positions.len());
        for p in positions {
            if p.uuid.is_some() && !unique.iter().any(|u| u.uuid == p.uuid) {
                unique.push(p);
            }
        }
        self.positions = unique;
    }

    pub fn to_input(&self) -> AuthorizationGroupInput {
        AuthorizationGroupInput {
            uuid: self.uuid.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            positions: self.positions.iter().filter_map(get_reference).collect(),
        }
    }
}

impl Model for AuthorizationGroup {
    const RESOURCE_NAME: &'static str = "AuthorizationGroup";
    const LIST_NAME: &'static str = "authorizationGroupList";
    const ROUTE: &'static str = paths::AUTHORIZATION_GROUPS_ROUTE;

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn validation_schema() -> &'static [FieldRule] {
        AUTHORIZATION_GROUP_SCHEMA
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "uuid" => FieldValue::opt_text(self.uuid.as_deref()),
            "name" => FieldValue::text(&self.name),
            "description" => FieldValue::text(&self.description),
            "status" => FieldValue::text(self.status.as_str()),
            "positions" => FieldValue::Count(self.positions.len()),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            "status" => self.status = value.trim().parse()?,
            _ => return Err(unknown_field::<Self>(name)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationGroupInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    pub description: String,
    pub status: Status,
    pub positions: Vec<Reference>,
}
