use thiserror::Error;

/// Why a nickname was refused. State is unchanged on every variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NicknameError {
    #[error("nickname is missing")]
    Missing,

    #[error("nickname is over {max} characters long")]
    TooLong { max: usize },

    #[error("nickname '{0}' is taken")]
    Taken(String),
}

/// Errors raised by the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("identity '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("corrupt identity state: {0}")]
    Corrupt(String),
}

/// Errors from the request-level session protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("client not registered")]
    NotRegistered,

    #[error("unrecognized token")]
    UnknownToken,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("nickname rejected: {0}")]
    NicknameRejected(#[from] NicknameError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<IdentityError> for SessionError {
    fn from(e: IdentityError) -> Self {
        SessionError::Internal(e.to_string())
    }
}

/// Errors from state repository operations (used by trait definitions in storm-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised while restoring or saving chat state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("message author not found (token {token:?}, address '{address}')")]
    DanglingAuthor {
        token: Option<String>,
        address: String,
    },

    #[error(transparent)]
    Corrupt(#[from] IdentityError),
}
