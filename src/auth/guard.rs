use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;

/// Allows the operation only when the acting user owns the resource.
///
/// Callers must establish that the resource exists before invoking this, so
/// not-found always takes precedence over forbidden.
pub fn ensure_owner(requester: Uuid, owner: Uuid) -> Result<(), ApiError> {
    if requester != owner {
        warn!(requester = %requester, owner = %owner, "ownership check failed");
        return Err(ApiError::Forbidden);
    }
    Ok(())
}
