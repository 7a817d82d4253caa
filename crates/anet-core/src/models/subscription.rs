use crate::models::{instant, Location, Model, Organization, Person, Position, Report, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user's subscription to one record. The subscribed record arrives as a
/// partial fragment whose shape depends on `subscribed_object_type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subscription {
    pub uuid: Option<String>,
    #[serde(deserialize_with = "instant::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "instant::deserialize_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    pub subscribed_object_type: String,
    pub subscribed_object_uuid: Option<String>,
    pub subscribed_object: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscribedObject {
    Location(Location),
    Organization(Organization),
    Person(Person),
    Position(Position),
    Report(Report),
    Task(Task),
}

impl SubscribedObject {
    pub fn kind(&self) -> &'static str {
        match self {
            SubscribedObject::Location(_) => Location::RESOURCE_NAME,
            SubscribedObject::Organization(_) => Organization::RESOURCE_NAME,
            SubscribedObject::Person(_) => Person::RESOURCE_NAME,
            SubscribedObject::Position(_) => Position::RESOURCE_NAME,
            SubscribedObject::Report(_) => Report::RESOURCE_NAME,
            SubscribedObject::Task(_) => Task::RESOURCE_NAME,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            SubscribedObject::Location(m) => m.display_name(),
            SubscribedObject::Organization(m) => m.display_name(),
            SubscribedObject::Person(m) => m.display_name(),
            SubscribedObject::Position(m) => m.display_name(),
            SubscribedObject::Report(m) => m.display_name(),
            SubscribedObject::Task(m) => m.display_name(),
        }
    }

    pub fn link_path(&self) -> Option<String> {
        match self {
            SubscribedObject::Location(m) => m.path_for(),
            SubscribedObject::Organization(m) => m.path_for(),
            SubscribedObject::Person(m) => m.path_for(),
            SubscribedObject::Position(m) => m.path_for(),
            SubscribedObject::Report(m) => m.path_for(),
            SubscribedObject::Task(m) => m.path_for(),
        }
    }
}

fn decode<M>(fragment: &Value, uuid: Option<&str>) -> Option<M>
where
    M: Model + serde::de::DeserializeOwned,
{
    let mut fragment = match fragment {
        Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    if let Some(uuid) = uuid {
        fragment.insert("uuid".to_string(), Value::String(uuid.to_string()));
    }
    serde_json::from_value(Value::Object(fragment)).ok()
}

impl Subscription {
    /// Decode the subscribed record for its declared type. Both the table
    /// name (`people`) and the singular resource name (`Person`) are accepted.
    pub fn subscribed_object(&self) -> Option<SubscribedObject> {
        let fragment = self.subscribed_object.clone().unwrap_or(Value::Null);
        let uuid = self.subscribed_object_uuid.as_deref();
        let kind = self.subscribed_object_type.to_ascii_lowercase();
        let object = match kind.as_str() {
            "location" | "locations" => SubscribedObject::Location(decode(&fragment, uuid)?),
            "organization" | "organizations" => {
                SubscribedObject::Organization(decode(&fragment, uuid)?)
            }
            "person" | "people" => SubscribedObject::Person(decode(&fragment, uuid)?),
            "position" | "positions" => SubscribedObject::Position(decode(&fragment, uuid)?),
            "report" | "reports" => SubscribedObject::Report(decode(&fragment, uuid)?),
            "task" | "tasks" => SubscribedObject::Task(decode(&fragment, uuid)?),
            _ => return None,
        };
        Some(object)
    }

    /// Route to the subscribed record, if its type is known.
    pub fn link_path(&self) -> Option<String> {
        self.subscribed_object().and_then(|o| o.link_path())
    }

    /// Label for the listing: the record's display name, falling back to the
    /// raw type and uuid when the fragment cannot be decoded.
    pub fn label(&self) -> String {
        match self.subscribed_object() {
            Some(object) => object.display_name(),
            None => format!(
                "{} {}",
                self.subscribed_object_type,
                self.subscribed_object_uuid.as_deref().unwrap_or("?")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(json: &str) -> Subscription {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn person_fragment_links_to_person() {
        let sub = subscription(
            r#"{"uuid":"s1","updatedAt":"2024-02-01T08:00:00Z",
                "subscribedObjectType":"people","subscribedObjectUuid":"p1",
                "subscribedObject":{"role":"ADVISOR","rank":"CIV","name":"ERINSON, Erin"}}"#,
        );
        let object = sub.subscribed_object().unwrap();
        assert_eq!(object.kind(), "Person");
        assert_eq!(sub.label(), "CIV ERINSON, Erin");
        assert_eq!(sub.link_path().as_deref(), Some("/people/p1"));
    }

    #[test]
    fn organization_fragment_uses_short_name() {
        let sub = subscription(
            r#"{"subscribedObjectType":"organizations","subscribedObjectUuid":"o1",
                "subscribedObject":{"shortName":"EF 2.2"}}"#,
        );
        assert_eq!(sub.label(), "EF 2.2");
        assert_eq!(sub.link_path().as_deref(), Some("/organizations/o1"));
    }

    #[test]
    fn unknown_type_falls_back_to_raw_label() {
        let sub = subscription(r#"{"subscribedObjectType":"widgets","subscribedObjectUuid":"w1"}"#);
        assert!(sub.subscribed_object().is_none());
        assert!(sub.link_path().is_none());
        assert_eq!(sub.label(), "widgets w1");
    }

    #[test]
    fn missing_fragment_still_links() {
        let sub = subscription(r#"{"subscribedObjectType":"tasks","subscribedObjectUuid":"t1"}"#);
        assert_eq!(sub.link_path().as_deref(), Some("/tasks/t1"));
    }
}
