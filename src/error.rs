use thiserror::Error;

/// Rejections raised at the edit boundary, before anything reaches the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task name cannot be empty")]
    EmptyName,
    #[error("duration must be greater than zero (got {0}s)")]
    NonPositiveDuration(i64),
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(ValidationError::EmptyName.to_string(), "task name cannot be empty");
        assert_eq!(
            ValidationError::NonPositiveDuration(0).to_string(),
            "duration must be greater than zero (got 0s)"
        );
        let err = ValidationError::InvalidNumber {
            field: "minutes",
            value: "1x".to_string(),
        };
        assert_eq!(err.to_string(), "minutes is not a number: \"1x\"");
    }
}
