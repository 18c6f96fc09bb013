use thiserror::Error;

use crate::state::EventStatus;

pub type Result<T> = std::result::Result<T, ErrorCode>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorCode {
    #[error("Insufficient role for this action")]
    Forbidden,
    #[error("Title must not be blank")]
    BlankTitle,
    #[error("Invalid time range")]
    InvalidTimeRange,
    #[error("Need at least 2 options")]
    InsufficientOptions,
    #[error("Too many options")]
    TooManyOptions,
    #[error("Options must not be blank")]
    BlankOption,
    #[error("Target must be greater than 0")]
    InvalidTarget,
    #[error("Invalid option")]
    InvalidOption,
    #[error("Results reference must not be blank")]
    BlankResultsReference,
    #[error("User id must not be blank")]
    BlankUserId,
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Invalid event type: {0}")]
    InvalidEventKind(String),
    #[error("Already voted on this event")]
    AlreadyVoted,
    #[error("Already signed this petition")]
    AlreadySigned,
    #[error("Event has not started")]
    NotStarted,
    #[error("Event has ended")]
    Expired,
    #[error("Event is not active")]
    EventNotActive,
    #[error("Event has not ended")]
    NotYetEnded,
    #[error("Event already finalized")]
    AlreadyFinalized,
    #[error("Cannot change status from {from} to {to}")]
    InvalidStatusTransition { from: EventStatus, to: EventStatus },
    #[error("Event not found")]
    NotFound,
    #[error("Template name must not be blank")]
    BlankTemplateName,
    #[error("Invalid template type: {0}")]
    InvalidTemplateKind(String),
    #[error("Template config must be a JSON object")]
    InvalidTemplateConfig,
    #[error("Template update has no fields")]
    EmptyTemplateUpdate,
    #[error("Template is not active")]
    TemplateInactive,
    #[error("Network id must not be blank")]
    BlankNetworkId,
    #[error("Template not found")]
    TemplateNotFound,
}

/// Failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Forbidden,
    Validation,
    DuplicateParticipation,
    NotYetEnded,
    NotFound,
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::Forbidden => ErrorKind::Forbidden,
            ErrorCode::AlreadyVoted | ErrorCode::AlreadySigned => {
                ErrorKind::DuplicateParticipation
            }
            ErrorCode::NotYetEnded => ErrorKind::NotYetEnded,
            ErrorCode::NotFound | ErrorCode::TemplateNotFound => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }
}

/// Return early with `$err` unless `$cond` holds.
#[macro_export]
macro_rules! require {
    ($cond:expr, $err:expr $(,)?) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_codes_share_a_kind() {
        assert_eq!(
            ErrorCode::AlreadyVoted.kind(),
            ErrorKind::DuplicateParticipation
        );
        assert_eq!(
            ErrorCode::AlreadySigned.kind(),
            ErrorKind::DuplicateParticipation
        );
    }

    #[test]
    fn range_and_option_errors_are_validation() {
        for code in [
            ErrorCode::InvalidTimeRange,
            ErrorCode::InsufficientOptions,
            ErrorCode::InvalidTarget,
            ErrorCode::InvalidOption,
            ErrorCode::AlreadyFinalized,
        ] {
            assert_eq!(code.kind(), ErrorKind::Validation, "{code}");
        }
    }

    #[test]
    fn transition_message_names_both_states() {
        let err = ErrorCode::InvalidStatusTransition {
            from: EventStatus::Completed,
            to: EventStatus::Active,
        };
        assert_eq!(err.to_string(), "Cannot change status from completed to active");
    }
}
