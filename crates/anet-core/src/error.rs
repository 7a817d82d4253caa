use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnetError {
    #[error("invalid organization type: {0}")]
    InvalidOrganizationType(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid position type: {0}")]
    InvalidPositionType(String),

    #[error("invalid person role: {0}")]
    InvalidRole(String),

    #[error("invalid report state: {0}")]
    InvalidReportState(String),

    #[error("invalid search object type: {0}")]
    InvalidObjectType(String),

    #[error("invalid log severity: {0}")]
    InvalidSeverity(String),

    #[error("Please provide a valid email address")]
    InvalidEmail(String),

    #[error("{message}")]
    DomainNotAllowed {
        address: String,
        message: String,
        allowed: Vec<String>,
    },

    #[error("Please provide one or more valid email addresses")]
    NoAddresses,

    #[error("unknown field '{field}' on {resource}")]
    UnknownField {
        resource: &'static str,
        field: String,
    },

    #[error("invalid value for field '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("approval step {0} does not exist")]
    ApprovalStepNotFound(usize),

    #[error("invalid value '{value}' for search filter '{key}'")]
    InvalidFilterValue { key: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnetError>;
