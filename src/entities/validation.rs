// ✅ Load-time validation errors
// A malformed record is rejected at the load boundary, never propagated into arithmetic.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Record label: the business center name, or `#<position>` when the name is missing
    pub record: String,
    /// Offending field, e.g. `latitude` or `companies[2].accruals`
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(record: &str, field: &str, message: &str) -> Self {
        ValidationError {
            record: record.to_string(),
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn missing(record: &str, field: &str) -> Self {
        Self::new(record, field, "Required field is missing")
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.record, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Join a batch of errors into one line for logs and `anyhow` messages.
pub fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
