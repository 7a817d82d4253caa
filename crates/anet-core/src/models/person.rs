use crate::error::Result;
use crate::models::{optional, unknown_field, FieldRule, FieldValue, Model, Position};
use crate::paths;
use crate::types::{PersonRole, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    pub rank: Option<String>,
    pub role: Option<PersonRole>,
    pub status: Status,
    pub email_address: Option<String>,
    pub domain_username: Option<String>,
    pub phone_number: Option<String>,
    pub position: Option<Box<Position>>,
}

const PERSON_SCHEMA: &[FieldRule] = &[
    FieldRule::required("name", "Name"),
    FieldRule::required("role", "Role"),
    FieldRule::email("emailAddress", "Email"),
];

impl Person {
    pub fn is_advisor(&self) -> bool {
        self.role == Some(PersonRole::Advisor)
    }

    pub fn is_principal(&self) -> bool {
        self.role == Some(PersonRole::Principal)
    }

    pub fn has_position(&self) -> bool {
        self.position
            .as_deref()
            .is_some_and(|p| p.uuid.is_some())
    }
}

impl Model for Person {
    const RESOURCE_NAME: &'static str = "Person";
    const LIST_NAME: &'static str = "personList";
    const ROUTE: &'static str = paths::PEOPLE_ROUTE;

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// `rank name`, or just the name when no rank is recorded.
    fn display_name(&self) -> String {
        match self.rank.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(rank) => format!("{rank} {}", self.name),
            None => self.name.clone(),
        }
    }

    fn validation_schema() -> &'static [FieldRule] {
        PERSON_SCHEMA
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "uuid" => FieldValue::opt_text(self.uuid.as_deref()),
            "name" => FieldValue::text(&self.name),
            "rank" => FieldValue::opt_text(self.rank.as_deref()),
            "role" => FieldValue::opt_text(self.role.map(PersonRole::as_str)),
            "status" => FieldValue::text(self.status.as_str()),
            "emailAddress" => FieldValue::opt_text(self.email_address.as_deref()),
            "domainUsername" => FieldValue::opt_text(self.domain_username.as_deref()),
            "phoneNumber" => FieldValue::opt_text(self.phone_number.as_deref()),
            "position" => self
                .position
                .as_deref()
                .map(|p| FieldValue::text(&p.name))
                .unwrap_or(FieldValue::Empty),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "name" => self.name = value.to_string(),
            "rank" => self.rank = optional(value),
            "role" => {
                self.role = match optional(value) {
                    Some(v) => Some(v.trim().parse()?),
                    None => None,
                }
            }
            "status" => self.status = value.trim().parse()?,
            "emailAddress" => self.email_address = optional(value).map(|v| v.trim().to_string()),
            "domainUsername" => self.domain_username = optional(value),
            "phoneNumber" => self.phone_number = optional(value),
            _ => return Err(unknown_field::<Self>(name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::EmailPolicy;

    #[test]
    fn display_name_prefixes_rank() {
        let mut p = Person {
            name: "ERINSON, Erin".to_string(),
            ..Person::default()
        };
        assert_eq!(p.display_name(), "ERINSON, Erin");
        p.rank = Some("CIV".to_string());
        assert_eq!(p.display_name(), "CIV ERINSON, Erin");
        p.rank = Some("  ".to_string());
        assert_eq!(p.display_name(), "ERINSON, Erin");
    }

    #[test]
    fn email_validated_against_policy() {
        let policy = EmailPolicy::new(["cmil.mil"], None);
        let mut p = Person {
            name: "Erin".to_string(),
            role: Some(PersonRole::Advisor),
            ..Person::default()
        };
        assert!(p.validate_with(Some(&policy)).is_empty());

        p.set_field("emailAddress", " erin@example.com ").unwrap();
        assert_eq!(p.email_address.as_deref(), Some("erin@example.com"));
        let errors = p.validate_with(Some(&policy));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "emailAddress");
        assert!(errors[0].message.contains("cmil.mil"));

        p.set_field("emailAddress", "erin@cmil.mil").unwrap();
        assert!(p.validate_with(Some(&policy)).is_empty());
    }

    #[test]
    fn role_predicates() {
        let mut p = Person::default();
        p.set_field("role", "PRINCIPAL").unwrap();
        assert!(p.is_principal());
        assert!(!p.is_advisor());
        assert!(!p.has_position());
    }
}
