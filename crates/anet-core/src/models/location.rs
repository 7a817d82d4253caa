use crate::error::Result;
use crate::models::{parse_number, unknown_field, FieldRule, FieldValue, Model};
use crate::paths;
use crate::types::Status;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub status: Status,
}

const LOCATION_SCHEMA: &[FieldRule] = &[FieldRule::required("name", "Name")];

impl Location {
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }
}

impl Model for Location {
    const RESOURCE_NAME: &'static str = "Location";
    const LIST_NAME: &'static str = "locationList";
    const ROUTE: &'static str = paths::LOCATIONS_ROUTE;

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn validation_schema() -> &'static [FieldRule] {
        LOCATION_SCHEMA
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "uuid" => FieldValue::opt_text(self.uuid.as_deref()),
            "name" => FieldValue::text(&self.name),
            "lat" => self.lat.map(FieldValue::Number).unwrap_or(FieldValue::Empty),
            "lng" => self.lng.map(FieldValue::Number).unwrap_or(FieldValue::Empty),
            "status" => FieldValue::text(self.status.as_str()),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "name" => self.name = value.to_string(),
            "lat" => self.lat = parse_number(name, value)?,
            "lng" => self.lng = parse_number(name, value)?,
            "status" => self.status = value.trim().parse()?,
            _ => return Err(unknown_field::<Self>(name)),
        }
        Ok(())
    }
}
