use crate::controller::{account_controller, health_check_controller};
use crate::response::account::{AccountResponse, VerifyResponse};
use crate::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// Global OpenAPI document. A path or schema only appears in the rendered
// document if it is listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Repurpose Connected Accounts API"
        ),
        paths(
            health_check_controller::health_check,
            account_controller::index,
            account_controller::read,
            account_controller::verify,
            account_controller::delete,
        ),
        components(
            schemas(
                AccountResponse,
                VerifyResponse,
                domain::connected_account::TokenStatus,
            )
        ),
        tags(
            (name = "repurpose_platform", description = "Connected social accounts and their OAuth tokens")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(account_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn account_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/users/{user_id}/accounts", get(account_controller::index))
        .route(
            "/users/{user_id}/accounts/{account_id}",
            get(account_controller::read),
        )
        .route(
            "/users/{user_id}/accounts/{account_id}",
            delete(account_controller::delete),
        )
        .route(
            "/users/{user_id}/accounts/{account_id}/verify",
            post(account_controller::verify),
        )
        .with_state(app_state)
}
