use std::future::Future;

use crate::application::ports::RepositoryError;
use crate::domain::{Owned, UserId};

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("{0} does not exist")]
    Missing(&'static str),
    #[error("{0} does not belong to the requesting user")]
    NotOwner(&'static str),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

/// Loads an entity and checks that `actor` owns it. Every mutating
/// operation on an owned entity goes through here.
pub async fn load_owned<T, F>(load: F, actor: &UserId, kind: &'static str) -> Result<T, AccessError>
where
    T: Owned,
    F: Future<Output = Result<Option<T>, RepositoryError>>,
{
    let entity = load.await?.ok_or(AccessError::Missing(kind))?;

    if !entity.is_owned_by(actor) {
        tracing::warn!(actor = %actor, owner = %entity.owner(), kind, "Ownership check failed");
        return Err(AccessError::NotOwner(kind));
    }

    Ok(entity)
}
