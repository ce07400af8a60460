use std::fmt;

/// Errors raised while configuring or running the clustering pass
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// Zoom table or override values are unusable
    InvalidConfig { message: String },
    /// Merge output does not account for every input event exactly once
    PartitionViolated { expected: usize, actual: usize },
    /// Anything else that went wrong inside the merge pass
    Internal { message: String },
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterError::InvalidConfig { message } => {
                write!(f, "Invalid cluster configuration: {}", message)
            }
            ClusterError::PartitionViolated { expected, actual } => {
                write!(
                    f,
                    "Cluster output covers {} events, expected {}",
                    actual, expected
                )
            }
            ClusterError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for ClusterError {}

/// Result type alias for clustering operations
pub type Result<T> = std::result::Result<T, ClusterError>;

impl ClusterError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        ClusterError::InvalidConfig {
            message: message.into(),
        }
    }
}
