//! Port abstraction for investor persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, User, UserDraft};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Return the user owning `draft.email`, creating it when unseen.
    ///
    /// An existing user keeps its stored name.
    async fn find_or_create(&self, draft: &UserDraft) -> Result<User, UserRepositoryError>;
}
