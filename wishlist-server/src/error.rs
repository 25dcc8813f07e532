//! Error taxonomy shared by the repository, service, and HTTP layers
//!
//! Every failure is one `WishError` variant, and every variant belongs to
//! exactly one `ErrorKind`. The HTTP layer only ever looks at the kind.

use thiserror::Error;

pub type WishResult<T> = Result<T, WishError>;

/// Coarse classification used to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller sent input that violates a field rule
    Validation,
    /// Request conflicts with the current state of the wish
    Conflict,
    /// No wish with the requested id
    NotFound,
    /// Store unreachable or query failure
    Infrastructure,
}

#[derive(Error, Debug)]
pub enum WishError {
    #[error("email not provided")]
    OwnerEmailRequired,

    #[error("title not provided")]
    TitleRequired,

    #[error("wish already bought")]
    AlreadyBought,

    #[error("wish not found")]
    NotFound { id: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl WishError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OwnerEmailRequired | Self::TitleRequired => ErrorKind::Validation,
            Self::AlreadyBought => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Database(_) => ErrorKind::Infrastructure,
        }
    }
}
