use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(#[from] globset::Error),

    #[error("Invalid regular expression: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("Schema mismatch on field `{field}`: expected {expected}, found {found}")]
    SchemaMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Chrome returned an error (code {code}): {message}")]
    Protocol { code: i64, message: String },
}

pub type OptionsResult<T> = Result<T, OptionsError>;
