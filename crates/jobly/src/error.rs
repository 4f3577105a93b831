//! Error types for jobly

use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Error types for fragment building and database operations
#[derive(Debug, Error)]
pub enum JoblyError {
    /// Caller supplied input the builder or a repository cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation (or an explicit duplicate check)
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Migration error
    #[cfg(feature = "migrate")]
    #[error("Migration error: {0}")]
    Migration(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl JoblyError {
    /// Create an invalid-argument error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Partial update called without any field.
    pub fn no_data() -> Self {
        Self::invalid("no data supplied")
    }

    /// A lower bound exceeds its upper bound.
    pub fn range_inverted(min_param: &str, max_param: &str) -> Self {
        Self::invalid(format!(
            "range inverted: '{min_param}' exceeds '{max_param}'"
        ))
    }

    /// A filter parameter the entity does not recognize.
    pub fn unsupported_filter_key(key: &str) -> Self {
        Self::invalid(format!("unsupported filter key: {key}"))
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a duplicate error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Errors caused by the request rather than the server.
    ///
    /// An HTTP front end maps these to 4xx responses.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::NotFound(_)
                | Self::Duplicate(_)
                | Self::ForeignKeyViolation(_)
                | Self::CheckViolation(_)
        )
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::Duplicate(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(feature = "migrate")]
impl From<refinery::Error> for JoblyError {
    fn from(err: refinery::Error) -> Self {
        Self::Migration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(JoblyError::no_data().is_client_error());
        assert!(JoblyError::not_found("x").is_client_error());
        assert!(JoblyError::Duplicate("x".into()).is_client_error());
        assert!(!JoblyError::Connection("down".into()).is_client_error());
        assert!(!JoblyError::decode("name", "bad").is_client_error());
    }

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(
            JoblyError::no_data().to_string(),
            "Invalid argument: no data supplied"
        );
        assert_eq!(
            JoblyError::unsupported_filter_key("color").to_string(),
            "Invalid argument: unsupported filter key: color"
        );
        assert_eq!(
            JoblyError::range_inverted("minEmployees", "maxEmployees").to_string(),
            "Invalid argument: range inverted: 'minEmployees' exceeds 'maxEmployees'"
        );
    }
}
