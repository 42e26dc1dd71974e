use aitools_core::CoreError;

/// Errors raised by the API client, the session store, and the query layer
#[derive(thiserror::Error, Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Error {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; `message` is the server's detail when it sent one
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not found in demo data: {0}")]
    NotFoundLocal(String),

    #[error("Not logged in. Run `aitools auth login` first")]
    Unauthenticated,

    #[error("This command requires an admin account")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Read paths may answer these from demo data instead
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Api { .. } | Error::Decode(_)
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
