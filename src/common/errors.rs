use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("environment variable {name} is not set")]
    MissingConfig { name: &'static str },
    #[error("environment variable {name} is invalid: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    #[error("event is missing required field {0}")]
    MissingField(&'static str),
    #[error("unsupported request type {0}")]
    UnsupportedRequestType(String),
    #[error("malformed event: {0}")]
    MalformedEvent(#[from] serde_json::Error),
    #[error("malformed StackId {0}")]
    MalformedStackId(String),

    #[error("failed to put s3://{bucket}/{key}: {message}")]
    PutObject {
        bucket: String,
        key: String,
        message: String,
    },
    #[error("failed to delete s3://{bucket}/{key}: {message}")]
    DeleteObject {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("callback request failed: {0}")]
    Callback(String),
    #[error("gave up sending callback after {attempts} attempts")]
    CallbackRetriesExhausted { attempts: u32 },
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Callback(value.to_string())
    }
}
