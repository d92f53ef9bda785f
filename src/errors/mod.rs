use thiserror::Error;

/// Field-level validation failures reported before anything is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Field '{field}' exceeds {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Field '{field}' must be one of [{allowed}], got '{value}'")]
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Field '{field}' must be exactly {expected} characters (got {actual})")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Field '{field}' references missing record {id}")]
    UnknownReference { field: &'static str, id: i64 },
}

#[derive(Error, Debug)]
pub enum BaleenError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Record errors
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Duplicate value for {collection}.{field}: {value}")]
    Uniqueness {
        collection: &'static str,
        field: String,
        value: String,
    },

    #[error("Record not found in {collection}: {id}")]
    NotFound { collection: &'static str, id: i64 },

    #[error("Feed {0} is still referenced by posts")]
    FeedInUse(i64),

    // Storage errors
    #[error("Could not connect to store: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type BaleenResult<T> = Result<T, BaleenError>;
