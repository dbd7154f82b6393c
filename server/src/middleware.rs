use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::extractors::{CurrentUser, USER_EMAIL_HEADER, USER_NAME_HEADER};
use crate::models::User;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Make sure the calling user has a row before any handler runs, so that
/// first-time organizers and buyers are known to the services.
pub async fn provision_user(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    if let Some(CurrentUser(user_id)) = CurrentUser::from_parts(&parts) {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let provisioned = match state.users.find_by_id(user_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => {
                let user = User::new(user_id, header(USER_NAME_HEADER), header(USER_EMAIL_HEADER));
                tracing::info!(user_id = %user_id, "Provisioning new user");
                state.users.upsert(&user).await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = provisioned {
            return AppError::from(e).into_response();
        }
    }

    next.run(Request::from_parts(parts, body)).await
}
