use thiserror::Error;

use crate::dock::{NodeId, NodeKind};

#[derive(Debug, Error)]
pub enum DockError {
    #[error("unknown panel type `{0}`")]
    UnknownPanelType(String),
    #[error("panel type `{0}` reached its instance limit")]
    PanelLimitReached(String),
    #[error("node {0} is not a live {1:?}")]
    InvalidNode(NodeId, NodeKind),
    #[error("failed to parse saved layout: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize layout: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("malformed layout: {0}")]
    MalformedState(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type DockResult<T> = Result<T, DockError>;
