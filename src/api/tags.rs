//! Tag write flow endpoint.

use axum::{extract::State, Extension, Json};

use super::{error, success, ApiResult};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{ActionType, Tag, WriteTagRequest};
use crate::AppState;

/// POST /api/tags - Write a new tag for the current user.
pub async fn write_tag(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<WriteTagRequest>,
) -> ApiResult<Tag> {
    let payload = request.payload();

    // Validate before any database call
    if !payload.has_identifier() {
        return error(AppError::Validation(
            "Please provide at least one ID (Asset, Shipment, or Container)".to_string(),
        ));
    }

    let tag_uid = request
        .tag_uid
        .as_deref()
        .filter(|uid| !uid.trim().is_empty())
        .map(|uid| uid.to_string())
        .unwrap_or_else(simulated_tag_uid);

    match state.repo.create_tag(&current.user.id, &tag_uid, &payload).await {
        Ok(tag) => {
            if let Err(e) = state
                .repo
                .append_log(&current.user.id, &tag.tag_uid, ActionType::Write, &payload)
                .await
            {
                tracing::warn!("Failed to record write audit entry: {}", e);
            }

            success(tag)
        }
        Err(e) => error(e),
    }
}

/// Generate a UID in the shape of a 7-byte NTAG identifier, e.g.
/// "04:A3:2F:12:B8:7C:80". No radio is involved; the UID only has to be
/// unique and recognizable.
fn simulated_tag_uid() -> String {
    let random = uuid::Uuid::new_v4();
    let mut bytes = vec![0x04u8];
    bytes.extend_from_slice(&random.as_bytes()[..6]);

    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}
