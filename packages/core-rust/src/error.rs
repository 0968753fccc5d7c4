use std::fmt::Display;

/// Result alias for every action handler.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Errors returned by action handlers and the middleware wrapping them.
///
/// Only two boundaries ever produce anything other than [`HandlerError::Domain`]:
/// the transaction middleware (unit-of-work outcome) and, indirectly, the
/// retry middleware, which hands back the last attempt's error as-is.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Business or infrastructure failure raised by a usecase or gateway.
    #[error(transparent)]
    Domain(#[from] anyhow::Error),
    /// The unit of work could not be opened; the inner handler never ran.
    #[error("unit of work failed to begin: {0}")]
    Begin(#[source] anyhow::Error),
    /// The inner handler succeeded but the unit of work failed to commit.
    #[error("unit of work failed to commit: {0}")]
    Commit(#[source] anyhow::Error),
    /// The inner handler failed and the rollback failed as well.
    #[error("unit of work failed to roll back: {0}")]
    Rollback(#[source] anyhow::Error),
}

impl HandlerError {
    /// Builds a domain error from a plain message.
    pub fn domain<M>(message: M) -> Self
    where
        M: Display + std::fmt::Debug + Send + Sync + 'static,
    {
        Self::Domain(anyhow::Error::msg(message))
    }

    /// Wraps a domain error with call-site context. Unit-of-work errors are
    /// returned untouched so their variant survives propagation.
    #[must_use]
    pub fn context<C>(self, context: C) -> Self
    where
        C: Display + Send + Sync + 'static,
    {
        match self {
            Self::Domain(err) => Self::Domain(err.context(context)),
            other => other,
        }
    }

    /// Returns `true` when the error came from the unit-of-work boundary.
    #[must_use]
    pub fn is_transactional(&self) -> bool {
        !matches!(self, Self::Domain(_))
    }
}
