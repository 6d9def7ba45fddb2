//! Unified error hierarchy for FitTrack
//!
//! Invalid input is reported through [`ValidationError`], persistence problems
//! through [`DatabaseError`]. Both fold into [`FitTrackError`], which the
//! registries and creation functions return.

use thiserror::Error;

/// Top-level error type for all FitTrack operations
#[derive(Debug, Error)]
pub enum FitTrackError {
    /// Malformed input rejected by a creation function or setter
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence operation errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Goal identifier unknown to the registry
    #[error("Goal not found: {id}")]
    GoalNotFound { id: i64 },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid-argument conditions raised by creation functions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Exercise category cannot be empty")]
    EmptyCategory,

    #[error("Invalid exercise category: {tag}. Valid categories are: CARDIO, STRENGTH, FLEXIBILITY")]
    UnknownCategory { tag: String },

    #[error("Exercise name cannot be empty")]
    EmptyName,

    #[error("Duration must be positive, got {minutes}")]
    NonPositiveDuration { minutes: u32 },

    #[error("Intensity must be between 1 and 10, got {value}")]
    IntensityOutOfRange { value: u8 },

    #[error("Plan type cannot be empty")]
    EmptyPlanType,

    #[error("Invalid plan type: {tag}. Valid types are: WEIGHT_LOSS, MUSCLE_GAIN, MAINTENANCE")]
    UnknownPlanType { tag: String },

    #[error("{field} must be positive, got {value}")]
    NonPositiveMetric { field: &'static str, value: f64 },

    #[error("Invalid workout focus: {tag}. Valid focus areas are: CARDIO, STRENGTH, MIXED")]
    UnknownFocus { tag: String },

    #[error("Invalid workout level: {tag}. Valid levels are: BEGINNER, ADVANCED")]
    UnknownLevel { tag: String },
}

/// Persistence operation errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Underlying SQLite failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The store reported that nothing was written
    #[error("Operation rejected by store: {operation}")]
    Rejected { operation: String },

    /// A stored row could not be decoded
    #[error("Corrupt row: {reason}")]
    CorruptRow { reason: String },
}

/// Result type alias for FitTrack operations
pub type Result<T> = std::result::Result<T, FitTrackError>;

impl FitTrackError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FitTrackError::Validation(_) => ErrorSeverity::Warning,
            FitTrackError::GoalNotFound { .. } => ErrorSeverity::Warning,
            FitTrackError::Database(DatabaseError::CorruptRow { .. }) => ErrorSeverity::Critical,
            FitTrackError::Database(_) => ErrorSeverity::Error,
            FitTrackError::Export(_) | FitTrackError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FitTrackError::Validation(err) => format!("Please check your input: {}", err),
            FitTrackError::Database(DatabaseError::Sqlite(_)) => {
                "Unable to save your changes. Please check the database file and try again."
                    .to_string()
            }
            FitTrackError::Database(DatabaseError::Rejected { operation }) => {
                format!("The change could not be saved ({}). Nothing was modified.", operation)
            }
            FitTrackError::GoalNotFound { id } => {
                format!("No goal with id {} exists.", id)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Stored data is inconsistent and needs attention
    Critical,
    /// Error that prevents the operation but the application can continue
    Error,
    /// Warning that the user can fix by changing the input
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "Critical",
            ErrorSeverity::Error => "Error",
            ErrorSeverity::Warning => "Warning",
        }
    }
}

/// Severity and display text for an error reaching the command line.
///
/// Domain errors get their [`FitTrackError::user_message`]; anything else is
/// shown with its full context chain.
pub fn describe(err: &anyhow::Error) -> (ErrorSeverity, String) {
    if let Some(e) = err.downcast_ref::<FitTrackError>() {
        return (e.severity(), e.user_message());
    }
    if let Some(e) = err.downcast_ref::<ValidationError>() {
        let e = FitTrackError::from(e.clone());
        return (e.severity(), e.user_message());
    }
    (ErrorSeverity::Error, format!("{:#}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = FitTrackError::from(ValidationError::EmptyName);
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = FitTrackError::Database(DatabaseError::Rejected {
            operation: "save_activity".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_user_messages() {
        let err = FitTrackError::from(ValidationError::UnknownCategory {
            tag: "YOGA".to_string(),
        });
        assert!(err.user_message().contains("YOGA"));

        let err = FitTrackError::GoalNotFound { id: 7 };
        assert!(err.user_message().contains("7"));
    }

    #[test]
    fn test_describe_domain_errors() {
        let err = anyhow::Error::from(FitTrackError::GoalNotFound { id: 3 });
        assert_eq!(
            describe(&err),
            (ErrorSeverity::Warning, "No goal with id 3 exists.".to_string())
        );

        let err = anyhow::Error::from(ValidationError::EmptyName);
        let (severity, message) = describe(&err);
        assert_eq!(severity, ErrorSeverity::Warning);
        assert_eq!(message, "Please check your input: Exercise name cannot be empty");

        let err = anyhow::Error::from(FitTrackError::Database(DatabaseError::Rejected {
            operation: "delete_goal".to_string(),
        }));
        let (severity, message) = describe(&err);
        assert_eq!(severity.to_tracing_level(), tracing::Level::ERROR);
        assert!(message.contains("delete_goal"));
    }

    #[test]
    fn test_describe_other_errors_keeps_context() {
        let err = anyhow::anyhow!("disk full").context("Failed to write config file");
        let (severity, message) = describe(&err);
        assert_eq!(severity, ErrorSeverity::Error);
        assert_eq!(message, "Failed to write config file: disk full");
    }

    #[test]
    fn test_validation_display() {
        let err = ValidationError::IntensityOutOfRange { value: 11 };
        assert_eq!(err.to_string(), "Intensity must be between 1 and 10, got 11");
    }
}
