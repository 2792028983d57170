use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::app::users::UserService;
use crate::http::AppError;
use crate::AppState;

/// The acting user, as asserted by the upstream authentication gateway.
///
/// Tokens are verified before requests reach this service; the gateway
/// forwards the user id in the configured identity header. The id must still
/// belong to an active account.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(&state.identity_header)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("missing identity"))?;

        let user_id = Uuid::parse_str(header.trim())
            .map_err(|_| AppError::unauthorized("invalid identity"))?;

        let active = UserService::new(state.db.clone())
            .is_active(user_id)
            .await
            .map_err(|err| AppError::from_service(err, "failed to authenticate"))?;

        if !active {
            return Err(AppError::unauthorized("invalid identity"));
        }

        Ok(AuthUser { user_id })
    }
}
