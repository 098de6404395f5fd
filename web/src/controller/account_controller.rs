use crate::controller::ApiResponse;
use crate::response::account::{AccountResponse, VerifyResponse};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::connected_account::ConnectedAccount;
use log::*;
use serde_json::json;

/// Load an account and make sure it belongs to `user_id`. Accounts owned by
/// someone else are reported exactly like missing ones.
async fn owned_account(
    app_state: &AppState,
    user_id: &str,
    account_id: &str,
) -> Result<ConnectedAccount, Error> {
    match app_state
        .token_service()
        .get_connected_account(account_id)
        .await?
    {
        Some(account) if account.user_id == user_id => Ok(account),
        _ => Err(Error::not_found()),
    }
}

/// GET all connected accounts of a user
#[utoipa::path(
    get,
    path = "/users/{user_id}/accounts",
    params(
        ("user_id" = String, Path, description = "Owner of the accounts"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the user's connected accounts", body = [AccountResponse]),
        (status = 503, description = "Account store unavailable")
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET connected accounts for user: {user_id}");

    let accounts: Vec<AccountResponse> = app_state
        .token_service()
        .get_connected_accounts(&user_id)
        .await?
        .iter()
        .map(AccountResponse::from)
        .collect();

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), accounts)))
}

/// GET one connected account of a user
#[utoipa::path(
    get,
    path = "/users/{user_id}/accounts/{account_id}",
    params(
        ("user_id" = String, Path, description = "Owner of the account"),
        ("account_id" = String, Path, description = "Connected account id"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the connected account", body = AccountResponse),
        (status = 404, description = "Account not found"),
        (status = 503, description = "Account store unavailable")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path((user_id, account_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET connected account {account_id} for user: {user_id}");

    let account = owned_account(&app_state, &user_id, &account_id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        AccountResponse::from(&account),
    )))
}

/// POST verify that a connected account can still produce a usable token,
/// refreshing it if needed
#[utoipa::path(
    post,
    path = "/users/{user_id}/accounts/{account_id}/verify",
    params(
        ("user_id" = String, Path, description = "Owner of the account"),
        ("account_id" = String, Path, description = "Connected account id"),
    ),
    responses(
        (status = 200, description = "Verification ran; see token_available", body = VerifyResponse),
        (status = 404, description = "Account not found"),
        (status = 503, description = "Account store unavailable")
    )
)]
pub async fn verify(
    State(app_state): State<AppState>,
    Path((user_id, account_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST verify connected account {account_id} for user: {user_id}");

    owned_account(&app_state, &user_id, &account_id).await?;

    let token_service = app_state.token_service();
    let token_available = token_service
        .get_valid_access_token(&account_id)
        .await?
        .is_some();
    let is_active = token_service
        .get_connected_account(&account_id)
        .await?
        .is_some_and(|account| account.is_active);

    if !token_available {
        info!("Connected account {account_id} needs to be reconnected");
    }

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        VerifyResponse {
            account_id,
            is_active,
            token_available,
        },
    )))
}

/// DELETE (disconnect) a connected account
#[utoipa::path(
    delete,
    path = "/users/{user_id}/accounts/{account_id}",
    params(
        ("user_id" = String, Path, description = "Owner of the account"),
        ("account_id" = String, Path, description = "Connected account id"),
    ),
    responses(
        (status = 200, description = "Successfully disconnected the account", body = [String]),
        (status = 404, description = "Account not found"),
        (status = 503, description = "Account store unavailable")
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path((user_id, account_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE connected account {account_id} for user: {user_id}");

    owned_account(&app_state, &user_id, &account_id).await?;

    if !app_state
        .token_service()
        .remove_connected_account(&account_id)
        .await?
    {
        return Err(Error::not_found());
    }

    info!("Disconnected account {account_id} for user {user_id}");
    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({"id": account_id}),
    )))
}
