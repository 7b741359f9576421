//! Tag read flow endpoint.
//!
//! No physical NFC radio is involved; a scan is a logical "read the newest
//! tag" operation against the store.

use axum::{extract::State, Extension};
use chrono::Utc;

use super::{error, success, ApiResult};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{ActionType, ScanResult};
use crate::AppState;

/// POST /api/scan - Read the current user's most recently written tag.
///
/// Marks the tag as scanned and appends a read entry to the audit log. The
/// two writes are sequential, not transactional: a failure in between is
/// surfaced to the caller and the scan can simply be retried. The log append
/// never happens for a scan that found no tag.
pub async fn scan_tag(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<ScanResult> {
    let tag = match state.repo.latest_tag(&current.user.id).await {
        Ok(Some(tag)) => tag,
        Ok(None) => {
            return error(AppError::NoTagFound(
                "No tag found. Write a tag first.".to_string(),
            ));
        }
        Err(e) => return error(e),
    };

    let scanned_at = Utc::now().to_rfc3339();

    if let Err(e) = state.repo.mark_scanned(&tag.id, &scanned_at).await {
        return error(e);
    }

    if let Err(e) = state
        .repo
        .append_log(
            &current.user.id,
            &tag.tag_uid,
            ActionType::Read,
            &tag.written_data,
        )
        .await
    {
        return error(e);
    }

    success(ScanResult::from_tag(&tag, scanned_at))
}
