//! Waitlist errors.

use thiserror::Error;

/// Errors returned by [`Waitlist`](crate::Waitlist) operations.
///
/// None of these are fatal. `NotFound` in particular is the expected outcome
/// when a promotion and a manual removal race for the same user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WaitlistError {
    /// An entry with this id is already waiting. The existing entry is kept.
    #[error("id '{0}' is already in the waitlist")]
    DuplicateId(String),

    /// No entry with this id is waiting.
    #[error("id '{0}' is not in the waitlist")]
    NotFound(String),

    /// Ids must be non-empty.
    #[error("id must not be empty")]
    EmptyId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            WaitlistError::DuplicateId("U1".into()).to_string(),
            "id 'U1' is already in the waitlist"
        );
        assert_eq!(
            WaitlistError::NotFound("U9".into()).to_string(),
            "id 'U9' is not in the waitlist"
        );
        assert_eq!(WaitlistError::EmptyId.to_string(), "id must not be empty");
    }
}
