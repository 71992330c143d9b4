// handlers/mod.rs - two security tiers
//
// Public (no auth, optional viewer identity) → Protected (session token required)

pub mod protected; // POST /ads
pub mod public; // /register, /login, GET /ads
pub mod system; // /, /health

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;
use crate::services::ServiceError;

/// Decode a JSON request body. Any malformed payload is a plain 400.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        ApiError::bad_request("Invalid request body")
    })
}

/// Bound a downstream call by the request deadline. Dropping the future on
/// expiry cancels the in-flight store operation.
pub(crate) async fn with_deadline<T, F>(limit: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| ServiceError::DeadlineExceeded(limit))?
}

/// Length check in characters, inclusive on both ends.
pub(crate) fn char_len_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_turns_into_service_error() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, ServiceError>(1)
        };
        let err = with_deadline(Duration::from_millis(10), slow).await.unwrap_err();
        assert!(matches!(err, ServiceError::DeadlineExceeded(_)));

        let fast = async { Ok::<_, ServiceError>(2) };
        assert_eq!(with_deadline(Duration::from_secs(1), fast).await.unwrap(), 2);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(char_len_between("äöü", 3, 3));
        assert!(!char_len_between("ab", 3, 50));
    }
}
