//! Ingestion body validation

use crate::error::{FlowWatchError, FlowWatchResult};
use crate::types::{NewEvent, ValidEvent};

/// Check a candidate failure report and apply defaults
///
/// `error_message` must be present and non-empty; `attempt` defaults to 0.
/// Every other field is kept exactly as received.
pub fn validate_new_event(candidate: NewEvent) -> FlowWatchResult<ValidEvent> {
    let error_message = match candidate.error_message {
        None => return Err(FlowWatchError::validation("error_message is required")),
        Some(message) if message.is_empty() => {
            return Err(FlowWatchError::validation(
                "error_message must be at least 1 character",
            ))
        }
        Some(message) => message,
    };

    Ok(ValidEvent {
        workflow_id: candidate.workflow_id,
        workflow_name: candidate.workflow_name,
        node: candidate.node,
        error_message,
        error_stack: candidate.error_stack,
        run_id: candidate.run_id,
        attempt: candidate.attempt.unwrap_or(0),
        payload: candidate.payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_error_message() {
        let result = validate_new_event(NewEvent::default());
        assert!(matches!(result, Err(FlowWatchError::Validation(_))));
    }

    #[test]
    fn test_empty_error_message() {
        let result = validate_new_event(NewEvent::with_message(""));
        assert!(matches!(result, Err(FlowWatchError::Validation(_))));
    }

    #[test]
    fn test_whitespace_message_is_accepted() {
        // Min length 1, no trimming
        let valid = validate_new_event(NewEvent::with_message(" ")).unwrap();
        assert_eq!(valid.error_message, " ");
    }

    #[test]
    fn test_attempt_defaults_to_zero() {
        let valid = validate_new_event(NewEvent::with_message("boom")).unwrap();
        assert_eq!(valid.attempt, 0);

        let valid = validate_new_event(NewEvent::with_message("boom").run("r1", 4)).unwrap();
        assert_eq!(valid.attempt, 4);
        assert_eq!(valid.run_id.as_deref(), Some("r1"));
    }
}
