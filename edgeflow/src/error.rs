use crate::model::HandleKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("node '{0}' does not exist")]
    NodeNotFound(String),

    #[error("edge '{0}' does not exist")]
    EdgeNotFound(String),

    #[error("edge id '{0}' is already in use")]
    DuplicateEdge(String),

    #[error("node '{node}' already has a {kind} handle with id {id:?}")]
    DuplicateHandle {
        node: String,
        kind: HandleKind,
        id: Option<String>,
    },

    #[error("'{param}' must be a finite number")]
    NonFinite { param: &'static str },

    #[error("invalid value for '{param}': {reason}")]
    InvalidValue { param: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl FlowError {
    /// Stable machine-readable code, used by the bindings.
    pub fn code(&self) -> &'static str {
        match self {
            FlowError::NodeNotFound(_) | FlowError::EdgeNotFound(_) => "invalid_id",
            FlowError::DuplicateEdge(_) => "duplicate_edge",
            FlowError::DuplicateHandle { .. } => "duplicate_handle",
            FlowError::NonFinite { .. } => "non_finite",
            FlowError::InvalidValue { .. } => "invalid_value",
            FlowError::Config(_) => "invalid_config",
        }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
