use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// SettingsWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DictField
// ---------------------------------------------------------------------------

/// Dictionary entry for a single form field. A field whose entry is missing
/// or empty is not shown at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl DictField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.label) && blank(&self.placeholder)
    }
}

// ---------------------------------------------------------------------------
// Per-side dictionaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgDictionary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<DictField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identification_code: Option<DictField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDictionary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<DictField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionDictionary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<DictField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideDictionary {
    pub org: OrgDictionary,
    pub person: PersonDictionary,
    pub position: PositionDictionary,
}

fn default_advisor() -> SideDictionary {
    SideDictionary {
        org: OrgDictionary {
            name: "Advisor Organization".to_string(),
            long_name: Some(
                DictField::new("Description").with_placeholder("e.g. Force Protection Advisors"),
            ),
            identification_code: Some(
                DictField::new("UIC").with_placeholder("the six character code"),
            ),
        },
        person: PersonDictionary {
            name: "NATO Member".to_string(),
            rank: Some(DictField::new("Rank")),
            ranks: vec![
                "CIV".to_string(),
                "CTR".to_string(),
                "OR-1".to_string(),
                "OF-1".to_string(),
                "OF-2".to_string(),
                "OF-3".to_string(),
            ],
        },
        position: PositionDictionary {
            name: "NATO Billet".to_string(),
            code: Some(DictField::new("Code").with_placeholder("the billet code")),
        },
    }
}

fn default_principal() -> SideDictionary {
    SideDictionary {
        org: OrgDictionary {
            name: "Afghan Government Organization".to_string(),
            long_name: Some(
                DictField::new("Official Organization Name")
                    .with_placeholder("e.g. Afghan Ministry of Defense"),
            ),
            identification_code: None,
        },
        person: PersonDictionary {
            name: "Afghan Partner".to_string(),
            rank: Some(DictField::new("Rank")),
            ranks: Vec::new(),
        },
        position: PositionDictionary {
            name: "Afghan Tashkil".to_string(),
            code: Some(DictField::new("Tashkil").with_placeholder("the tashkil code")),
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsConfig {
    #[serde(default = "default_advisor")]
    pub advisor: SideDictionary,
    #[serde(default = "default_principal")]
    pub principal: SideDictionary,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            advisor: default_advisor(),
            principal: default_principal(),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings (top-level)
// ---------------------------------------------------------------------------

/// Client-side dictionary: allowed email domains, support contact, and the
/// labels shown for advisor and principal records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_domain_names")]
    pub domain_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email_addr: Option<String>,
    #[serde(default)]
    pub fields: FieldsConfig,
}

fn default_domain_names() -> Vec<String> {
    vec![
        "cmil.mil".to_string(),
        "mission.ita".to_string(),
        "nato.int".to_string(),
        "dds.mil".to_string(),
        "*.isaf.nato.int".to_string(),
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain_names: default_domain_names(),
            support_email_addr: None,
            fields: FieldsConfig::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&data)?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load from `path` when given, otherwise fall back to the built-in
    /// dictionary.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<SettingsWarning> {
        let mut warnings = Vec::new();

        // 1. At least one allowed email domain
        if self.domain_names.is_empty() {
            warnings.push(SettingsWarning {
                level: WarnLevel::Error,
                message: "domain_names is empty: no email address can validate".to_string(),
            });
        }

        // 2. No duplicate domains (case-insensitive)
        let mut seen = HashSet::new();
        for domain in &self.domain_names {
            let lower = domain.trim().to_lowercase();
            if lower.is_empty() {
                warnings.push(SettingsWarning {
                    level: WarnLevel::Error,
                    message: "domain_names contains a blank entry".to_string(),
                });
                continue;
            }
            if !seen.insert(lower.clone()) {
                warnings.push(SettingsWarning {
                    level: WarnLevel::Warning,
                    message: format!("duplicate domain '{}' in domain_names", domain),
                });
            }
            // 3. Wildcards must be '*' followed by a dotted suffix
            if let Some(suffix) = lower.strip_prefix('*') {
                if !suffix.starts_with('.') || suffix.len() < 2 {
                    warnings.push(SettingsWarning {
                        level: WarnLevel::Warning,
                        message: format!(
                            "wildcard domain '{}' should look like '*.example.com'",
                            domain
                        ),
                    });
                }
            } else if lower.contains('*') {
                warnings.push(SettingsWarning {
                    level: WarnLevel::Error,
                    message: format!("'*' is only allowed as the first character: '{}'", domain),
                });
            }
        }

        // 4. Type display names must not be blank
        for (side, dict) in [
            ("advisor", &self.fields.advisor),
            ("principal", &self.fields.principal),
        ] {
            for (what, name) in [
                ("org", &dict.org.name),
                ("person", &dict.person.name),
                ("position", &dict.position.name),
            ] {
                if name.trim().is_empty() {
                    warnings.push(SettingsWarning {
                        level: WarnLevel::Error,
                        message: format!("fields.{side}.{what}.name is blank"),
                    });
                }
            }
        }

        if self.fields.advisor.org.name == self.fields.principal.org.name {
            warnings.push(SettingsWarning {
                level: WarnLevel::Warning,
                message: "advisor and principal organizations share the same display name"
                    .to_string(),
            });
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_validate_clean() {
        let warnings = Settings::default().validate();
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn partial_yaml_merges_over_defaults() {
        let yaml = "domain_names:\n  - example.com\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.domain_names, vec!["example.com"]);
        assert_eq!(settings.fields.advisor.org.name, "Advisor Organization");
        assert!(settings.support_email_addr.is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf/settings.yaml");
        let mut settings = Settings::default();
        settings.support_email_addr = Some("help@dds.mil".to_string());
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.support_email_addr.as_deref(), Some("help@dds.mil"));
        assert_eq!(loaded.domain_names, settings.domain_names);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Settings::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, crate::AnetError::Io(_)));
    }

    #[test]
    fn validate_flags_empty_domain_list() {
        let settings = Settings {
            domain_names: vec![],
            ..Settings::default()
        };
        let warnings = settings.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("domain_names is empty")));
    }

    #[test]
    fn validate_flags_duplicates_and_bad_wildcards() {
        let settings = Settings {
            domain_names: vec![
                "nato.int".to_string(),
                "NATO.int".to_string(),
                "*mil".to_string(),
                "a.*.mil".to_string(),
            ],
            ..Settings::default()
        };
        let warnings = settings.validate();
        assert!(warnings.iter().any(|w| w.message.contains("duplicate domain")));
        assert!(warnings.iter().any(|w| w.message.contains("'*mil'")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("only allowed as the first character")));
    }

    #[test]
    fn dict_field_emptiness() {
        assert!(DictField::default().is_empty());
        assert!(DictField {
            label: Some("  ".to_string()),
            placeholder: None
        }
        .is_empty());
        assert!(!DictField::new("UIC").is_empty());
    }
}
