//! Request extractors

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use txnstack_core::RequestContext;

use crate::AppState;

/// Caller identity taken from the configured user header.
///
/// Missing or blank headers fall back to the configured default user.
/// There is no verification; this only names the caller for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub RequestContext);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = &state.config.auth;
        let user_id = parts
            .headers
            .get(auth.user_header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(auth.default_user_id.as_str());

        log::debug!("User authenticated: userId={}", user_id);
        Ok(CurrentUser(RequestContext::new(user_id)))
    }
}
