//! `/api/v1/locks`

use axum::extract::{Path, State};
use seedfront_core::db::{Lock, queries};
use serde::Serialize;
use serde_json::Value;

use super::{iso_or_zero, query};
use crate::envelope::Envelope;
use crate::errors::ApiError;
use crate::server::AppState;

const KIND: &str = "Lock";

#[derive(Debug, Serialize)]
pub struct LockItem {
    pub key: String,
    pub pid: i64,
    pub locked: bool,
    pub locked_at: Value,
    /// `null` while the lock is held
    pub unlocked_at: Value,
}

impl From<Lock> for LockItem {
    fn from(lock: Lock) -> Self {
        let unlocked_at = if lock.unlocked_at.is_unset() {
            Value::Null
        } else {
            iso_or_zero(&lock.unlocked_at)
        };
        Self {
            key: lock.key,
            pid: lock.pid,
            locked: lock.locked,
            locked_at: iso_or_zero(&lock.locked_at),
            unlocked_at,
        }
    }
}

/// `GET /api/v1/locks`
pub async fn list_locks(State(state): State<AppState>) -> Result<Envelope<Vec<LockItem>>, ApiError> {
    let locks = query(&state, queries::list_locks).await?;
    Ok(Envelope::ok(KIND, locks.into_iter().map(LockItem::from).collect()))
}

/// `GET /api/v1/locks/{key}`
pub async fn get_lock(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Envelope<LockItem>, ApiError> {
    let lookup = key.clone();
    let lock = query(&state, move |conn| queries::get_lock(conn, &lookup))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Lock {key} doesn't exist")))?;
    Ok(Envelope::ok(KIND, LockItem::from(lock)))
}

#[cfg(test)]
mod tests {
    use seedfront_core::db::Timestamp;

    use super::*;

    #[test]
    fn test_held_lock_has_null_unlocked_at() {
        let item = LockItem::from(Lock {
            key: "sync_seedbox".to_string(),
            pid: 84074,
            locked: true,
            locked_at: Timestamp::parse("2025-05-20 21:50:46"),
            unlocked_at: Timestamp::Unset,
        });
        let value = serde_json::to_value(&item).unwrap();
        assert!(value["unlocked_at"].is_null());
        assert_eq!(value["locked_at"], "2025-05-20T21:50:46");
        assert_eq!(value["pid"], 84074);
    }
}
