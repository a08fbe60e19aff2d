use serde_json::Value;

use crate::app_state::AppState;
use crate::db::{self, OrderedCollection};
use crate::errors::{map_db_error, ServerError};
use crate::models::{now_timestamp, parse_reorder};

/// Applies a `[{id, order}]` payload. `Ok(false)` means the list was empty
/// and nothing was written.
pub(super) async fn apply_payload(
    state: &AppState,
    collection: OrderedCollection,
    payload: &Value,
) -> Result<bool, ServerError> {
    let items = parse_reorder(payload)?;
    if items.is_empty() {
        return Ok(false);
    }

    let touched = db::apply_reorder(&state.pool, collection, &items, now_timestamp())
        .await
        .map_err(|e| map_db_error(e, "reorder failed"))?;
    if touched < items.len() as u64 {
        tracing::debug!(
            table = collection.table(),
            skipped = items.len() as u64 - touched,
            "reorder skipped unknown ids"
        );
    }
    Ok(true)
}

/// Default `order` for a new document: the current collection size.
pub(super) async fn next_order(state: &AppState, collection: OrderedCollection) -> Result<i64, ServerError> {
    db::count(&state.pool, collection)
        .await
        .map_err(|e| map_db_error(e, "count failed"))
}
