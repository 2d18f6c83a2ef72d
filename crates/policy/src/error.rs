//! Policy error types.

use thiserror::Error;

/// A principal that cannot be resolved into an ability.
///
/// Raised when the principal's id is empty or its role is not one of the
/// known roles. Callers should treat this as an authentication or integrity
/// failure, not as a permission denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid principal: {reason}")]
pub struct InvalidPrincipal {
    reason: String,
}

impl InvalidPrincipal {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Policy errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The principal has an empty id or an unknown role.
    #[error(transparent)]
    InvalidPrincipal(#[from] InvalidPrincipal),

    /// An action name that is not one of the known actions.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A rule was built with a malformed condition.
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// The engine configuration is invalid.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// Failed to parse an engine configuration file.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// An I/O error occurred while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this error came from an unresolvable principal.
    pub fn is_invalid_principal(&self) -> bool {
        matches!(self, Error::InvalidPrincipal(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
