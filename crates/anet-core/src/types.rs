use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnetError;

// ---------------------------------------------------------------------------
// OrganizationType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationType {
    AdvisorOrg,
    PrincipalOrg,
}

impl OrganizationType {
    pub fn all() -> &'static [OrganizationType] {
        &[OrganizationType::AdvisorOrg, OrganizationType::PrincipalOrg]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrganizationType::AdvisorOrg => "ADVISOR_ORG",
            OrganizationType::PrincipalOrg => "PRINCIPAL_ORG",
        }
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrganizationType {
    type Err = AnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADVISOR_ORG" => Ok(OrganizationType::AdvisorOrg),
            "PRINCIPAL_ORG" => Ok(OrganizationType::PrincipalOrg),
            _ => Err(AnetError::InvalidOrganizationType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn all() -> &'static [Status] {
        &[Status::Active, Status::Inactive]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Inactive => "INACTIVE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = AnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Status::Active),
            "INACTIVE" => Ok(Status::Inactive),
            _ => Err(AnetError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PositionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionType {
    Advisor,
    Principal,
    SuperUser,
    Administrator,
}

impl PositionType {
    pub fn all() -> &'static [PositionType] {
        &[
            PositionType::Advisor,
            PositionType::Principal,
            PositionType::SuperUser,
            PositionType::Administrator,
        ]
    }

    /// Position types that may hold an approver slot or belong to an
    /// authorization group.
    pub fn advisor_side() -> &'static [PositionType] {
        &[
            PositionType::Advisor,
            PositionType::SuperUser,
            PositionType::Administrator,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PositionType::Advisor => "ADVISOR",
            PositionType::Principal => "PRINCIPAL",
            PositionType::SuperUser => "SUPER_USER",
            PositionType::Administrator => "ADMINISTRATOR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PositionType::Advisor => "Advisor",
            PositionType::Principal => "Principal",
            PositionType::SuperUser => "Super User",
            PositionType::Administrator => "Administrator",
        }
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PositionType {
    type Err = AnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADVISOR" => Ok(PositionType::Advisor),
            "PRINCIPAL" => Ok(PositionType::Principal),
            "SUPER_USER" => Ok(PositionType::SuperUser),
            "ADMINISTRATOR" => Ok(PositionType::Administrator),
            _ => Err(AnetError::InvalidPositionType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PersonRole
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonRole {
    Advisor,
    Principal,
}

impl PersonRole {
    pub fn all() -> &'static [PersonRole] {
        &[PersonRole::Advisor, PersonRole::Principal]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PersonRole::Advisor => "ADVISOR",
            PersonRole::Principal => "PRINCIPAL",
        }
    }
}

impl fmt::Display for PersonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PersonRole {
    type Err = AnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADVISOR" => Ok(PersonRole::Advisor),
            "PRINCIPAL" => Ok(PersonRole::Principal),
            _ => Err(AnetError::InvalidRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ReportState
// ---------------------------------------------------------------------------

/// Server-assigned report workflow state. The client never transitions a
/// report itself; it only branches on the state the server returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportState {
    #[default]
    Draft,
    PendingApproval,
    Approved,
    Published,
    Rejected,
    Cancelled,
    Future,
}

impl ReportState {
    pub fn all() -> &'static [ReportState] {
        &[
            ReportState::Draft,
            ReportState::PendingApproval,
            ReportState::Approved,
            ReportState::Published,
            ReportState::Rejected,
            ReportState::Cancelled,
            ReportState::Future,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportState::Draft => "DRAFT",
            ReportState::PendingApproval => "PENDING_APPROVAL",
            ReportState::Approved => "APPROVED",
            ReportState::Published => "PUBLISHED",
            ReportState::Rejected => "REJECTED",
            ReportState::Cancelled => "CANCELLED",
            ReportState::Future => "FUTURE",
        }
    }
}

impl fmt::Display for ReportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportState {
    type Err = AnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportState::all()
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| AnetError::InvalidReportState(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SearchObjectType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchObjectType {
    Reports,
    People,
    Organizations,
    Positions,
    Locations,
    Tasks,
    AuthorizationGroups,
}

impl SearchObjectType {
    pub fn all() -> &'static [SearchObjectType] {
        &[
            SearchObjectType::Reports,
            SearchObjectType::People,
            SearchObjectType::Organizations,
            SearchObjectType::Positions,
            SearchObjectType::Locations,
            SearchObjectType::Tasks,
            SearchObjectType::AuthorizationGroups,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchObjectType::Reports => "REPORTS",
            SearchObjectType::People => "PEOPLE",
            SearchObjectType::Organizations => "ORGANIZATIONS",
            SearchObjectType::Positions => "POSITIONS",
            SearchObjectType::Locations => "LOCATIONS",
            SearchObjectType::Tasks => "TASKS",
            SearchObjectType::AuthorizationGroups => "AUTHORIZATION_GROUPS",
        }
    }
}

impl fmt::Display for SearchObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchObjectType {
    type Err = AnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase().replace('-', "_");
        SearchObjectType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| AnetError::InvalidObjectType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// LogSeverity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogSeverity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogSeverity {
    pub fn all() -> &'static [LogSeverity] {
        &[
            LogSeverity::Debug,
            LogSeverity::Info,
            LogSeverity::Warn,
            LogSeverity::Error,
            LogSeverity::Fatal,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warn => "WARN",
            LogSeverity::Error => "ERROR",
            LogSeverity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogSeverity {
    type Err = AnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogSeverity::Debug),
            "INFO" => Ok(LogSeverity::Info),
            "WARN" => Ok(LogSeverity::Warn),
            "ERROR" => Ok(LogSeverity::Error),
            "FATAL" => Ok(LogSeverity::Fatal),
            _ => Err(AnetError::InvalidSeverity(s.to_string())),
        }
    }
}
