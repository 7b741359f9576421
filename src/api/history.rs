//! History flow endpoint.

use axum::{
    extract::{Query, State},
    Extension,
};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{ActionType, LogEntry};
use crate::AppState;

/// Maximum number of audit rows fetched per request.
pub const HISTORY_FETCH_LIMIT: i64 = 50;

/// History query parameters.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Substring filter over tag UID and identifier fields.
    #[serde(default)]
    pub q: Option<String>,
    /// Narrow to "read" or "write" entries; "all" or absent keeps both.
    #[serde(default)]
    pub action: Option<String>,
}

/// GET /api/history - List recent audit log entries for the current user.
///
/// Fetches the newest rows and filters them in memory; the result is a pure
/// function of the fetched rows and the query parameters.
pub async fn list_history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<HistoryQuery>,
) -> ApiResult<Vec<LogEntry>> {
    let action = match params.action.as_deref() {
        None | Some("all") => None,
        Some(s) => match ActionType::from_str(s) {
            Some(a) => Some(a),
            None => {
                return error(AppError::BadRequest(
                    "action must be 'read', 'write', or 'all'".to_string(),
                ));
            }
        },
    };

    let rows = match state
        .repo
        .list_logs(&current.user.id, HISTORY_FETCH_LIMIT)
        .await
    {
        Ok(rows) => rows,
        Err(e) => return error(e),
    };

    let query = params.q.unwrap_or_default();
    let entries: Vec<LogEntry> = rows
        .into_iter()
        .filter(|entry| entry.matches(&query))
        .filter(|entry| action.map_or(true, |a| entry.action_type == a))
        .collect();

    success(entries)
}
