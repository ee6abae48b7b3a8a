use crate::Action;
use crate::store::StoreError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("malformed capability: {0:?}")]
    Malformed(String),
    #[error("unknown module: {0}")]
    UnknownModule(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("module {module} does not support {action}")]
    ActionNotAllowed { module: String, action: Action },
}

pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Failures surfaced by the engine. Only store connectivity escapes; every
/// other problem degrades to a deny or an empty result.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("permission store {operation} failed")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("permission store {operation} timed out after {timeout:?}")]
    StoreTimeout {
        operation: &'static str,
        timeout: Duration,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("role {role} may not perform {operation}")]
    Forbidden { role: String, operation: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(CapabilityError::Malformed("x".to_string())),
            Box::new(CapabilityError::UnknownModule("x".to_string())),
            Box::new(CapabilityError::UnknownAction("x".to_string())),
            Box::new(CapabilityError::ActionNotAllowed {
                module: "archive".to_string(),
                action: Action::Delete,
            }),
            Box::new(EngineError::StoreTimeout {
                operation: "find_all",
                timeout: Duration::from_millis(50),
            }),
            Box::new(AdminError::Forbidden {
                role: "viewer".to_string(),
                operation: "permissions.roles.update".to_string(),
            }),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }

    #[test]
    fn store_failure_keeps_source() {
        let err = EngineError::Store {
            operation: "insert",
            source: StoreError::Unavailable("connection refused".to_string()),
        };
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("connection refused"));
    }
}
