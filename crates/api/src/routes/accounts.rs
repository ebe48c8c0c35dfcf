//! Payment account routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::info;

use crate::{AppState, error::error_response, middleware::AuthUser};
use phortune_core::account_detail::AccountDetailAssembler;
use phortune_db::BillingRepository;
use phortune_shared::AppError;
use phortune_shared::types::AccountId;

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/phortune/{account_id}/", get(get_account_detail))
}

/// Parses a path segment made only of digits.
fn parse_account_id(raw: &str) -> Option<AccountId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Returns the account detail page model.
///
/// Accounts the viewer cannot both view and edit answer 404, exactly as
/// missing accounts and malformed ids do.
async fn get_account_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let Some(account_id) = parse_account_id(&raw_id) else {
        return error_response(&AppError::NotFound(format!("account {raw_id}")));
    };
    let viewer = auth.viewer();
    let repo = Arc::new(BillingRepository::new((*state.db).clone()));

    match AccountDetailAssembler::new(repo)
        .assemble(&viewer, account_id)
        .await
    {
        Ok(page) => {
            info!(
                account_id = %account_id,
                viewer = %viewer.user_id,
                "Served account detail page"
            );
            (StatusCode::OK, Json(page)).into_response()
        }
        Err(e) => error_response(&AppError::from(e)),
    }
}
