use crate::error::Result;
use crate::models::{unknown_field, FieldRule, FieldValue, Model};
use crate::paths;
use crate::types::Status;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub short_name: String,
    pub long_name: String,
    pub status: Status,
}

const TASK_SCHEMA: &[FieldRule] = &[
    FieldRule::required("shortName", "Name"),
    FieldRule::required("longName", "Description"),
];

impl Model for Task {
    const RESOURCE_NAME: &'static str = "Task";
    const LIST_NAME: &'static str = "taskList";
    const ROUTE: &'static str = paths::TASKS_ROUTE;

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn display_name(&self) -> String {
        if self.short_name.is_empty() {
            self.long_name.clone()
        } else {
            self.short_name.clone()
        }
    }

    fn validation_schema() -> &'static [FieldRule] {
        TASK_SCHEMA
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "uuid" => FieldValue::opt_text(self.uuid.as_deref()),
            "shortName" => FieldValue::text(&self.short_name),
            "longName" => FieldValue::text(&self.long_name),
            "status" => FieldValue::text(self.status.as_str()),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "shortName" => self.short_name = value.to_string(),
            "longName" => self.long_name = value.to_string(),
            "status" => self.status = value.trim().parse()?,
            _ => return Err(unknown_field::<Self>(name)),
        }
        Ok(())
    }
}
