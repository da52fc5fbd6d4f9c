//! Client errors.
//!
//! Three caller-visible kinds: validation failures (no I/O was attempted),
//! daemon rejections (the request reached the daemon and was refused), and
//! internal-communication failures (everything below the protocol layer,
//! deliberately collapsed into one kind — a failed attempt should be
//! retried or escalated, not debugged by kind).

use polo_protocol::ProtocolError;
use polo_types::Action;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoloError {
    #[error("The name of the service '{0}' is invalid")]
    InvalidServiceName(String),

    #[error("Invalid multicast group address '{0}'")]
    InvalidMulticastGroup(String),

    #[error("{flag} must be boolean")]
    InvalidFlag { flag: &'static str },

    #[error("Error in {} of '{service}': '{message}'", .operation.label())]
    Daemon {
        operation: Action,
        service: String,
        message: String,
    },

    #[error("Error during internal communication: {0}")]
    Internal(String),
}

impl PoloError {
    /// Whether this error was raised before any I/O was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidServiceName(_) | Self::InvalidMulticastGroup(_) | Self::InvalidFlag { .. }
        )
    }
}

impl From<ProtocolError> for PoloError {
    fn from(err: ProtocolError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daemon_error_carries_call_context() {
        let err = PoloError::Daemon {
            operation: Action::Publish,
            service: "dummy".to_string(),
            message: "the service already exists".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error in publishing of 'dummy': 'the service already exists'"
        );

        let err = PoloError::Daemon {
            operation: Action::Unpublish,
            service: "dummy".to_string(),
            message: "no such service".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error in unpublishing of 'dummy': 'no such service'"
        );
    }

    #[test]
    fn validation_messages_match_daemon_wording() {
        assert_eq!(
            PoloError::InvalidServiceName(String::new()).to_string(),
            "The name of the service '' is invalid"
        );
        assert_eq!(
            PoloError::InvalidMulticastGroup("1.1.1.1".to_string()).to_string(),
            "Invalid multicast group address '1.1.1.1'"
        );
        assert_eq!(
            PoloError::InvalidFlag { flag: "permanent" }.to_string(),
            "permanent must be boolean"
        );
    }

    #[test]
    fn protocol_errors_collapse_to_internal() {
        let err: PoloError = ProtocolError::Timeout(std::time::Duration::from_millis(1000)).into();
        assert!(matches!(err, PoloError::Internal(_)));
        assert!(err.to_string().contains("internal communication"));

        let err: PoloError = ProtocolError::MalformedResponse("{".to_string()).into();
        assert!(matches!(err, PoloError::Internal(_)));
    }

    #[test]
    fn validation_kinds_are_flagged() {
        assert!(PoloError::InvalidServiceName("1".to_string()).is_validation());
        assert!(PoloError::InvalidMulticastGroup("1.1.1.1".to_string()).is_validation());
        assert!(PoloError::InvalidFlag { flag: "permanent" }.is_validation());
        assert!(!PoloError::Internal("timeout".to_string()).is_validation());
    }
}
