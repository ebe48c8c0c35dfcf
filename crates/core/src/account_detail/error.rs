//! Account detail error types.

use thiserror::Error;

use phortune_shared::AppError;
use phortune_shared::types::AccountId;

/// Errors that can occur while assembling an account page.
#[derive(Debug, Error)]
pub enum AccountDetailError {
    /// The account does not exist, or the viewer may not view and edit it.
    /// The two cases are deliberately indistinguishable.
    #[error("account not accessible: {0}")]
    AccountNotAccessible(AccountId),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AccountDetailError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<AccountDetailError> for AppError {
    fn from(err: AccountDetailError) -> Self {
        match err {
            AccountDetailError::AccountNotAccessible(id) => {
                Self::NotFound(format!("account {id}"))
            }
            AccountDetailError::Repository(msg) => Self::Database(msg),
        }
    }
}
