//! Optimistic read-modify-write transactions over a `DocumentStore`

use crate::document::{not_found, DocumentStore};
use audiostories_core::{AppError, Result};
use serde_json::Value;

/// Default number of attempts before a transaction gives up
pub const DEFAULT_TRANSACTION_ATTEMPTS: usize = 5;

/// Runs `apply` against the current body of `collection/id` and commits the result.
///
/// If another writer commits between the read and the write, the document is
/// re-read and `apply` runs again on the fresh body, up to `max_attempts`
/// times. `apply` may therefore run more than once and must only touch the
/// body it is given. An error from `apply` aborts without writing.
///
/// Fails with `RecordNotFound` if the document does not exist and with
/// `TransactionConflict` once the attempts are used up.
pub async fn run_transaction<S, F, T>(
    store: &S,
    collection: &str,
    id: &str,
    max_attempts: usize,
    mut apply: F,
) -> Result<T>
where
    S: DocumentStore + ?Sized,
    F: FnMut(&mut Value) -> Result<T>,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let document = store
            .get(collection, id)
            .await?
            .ok_or_else(|| not_found(collection, id))?;

        let mut body = document.data;
        let output = apply(&mut body)?;

        if store
            .compare_and_set(collection, id, document.version, body)
            .await?
        {
            return Ok(output);
        }

        log::debug!(
            "Transaction on {}/{} lost a write race (attempt {}/{})",
            collection,
            id,
            attempt,
            max_attempts
        );
    }

    Err(AppError::TransactionConflict {
        document: format!("{}/{}", collection, id),
        attempts: max_attempts,
    })
}
