//! Connected-account domain: the account model, the persistence adapter and the
//! valid-token orchestrator that callers use before talking to a platform API.
//!
//! Platform types are re-exported from `platform_auth` so that `web` and the
//! binary never need to depend on it directly.
pub use platform_auth::{
    refresh::{Refresher, TokenEndpointClient},
    registry::{ClientCredentials, PlatformRegistry},
    Platform, RefreshResult, Tokens,
};

pub use entity_api::Id;

pub mod account_registry;
pub mod account_store;
pub mod connected_account;
pub mod error;
pub mod platforms;
pub mod posting;
pub mod token_service;

#[cfg(test)]
pub(crate) mod test_support;
