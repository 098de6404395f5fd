//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use platform_auth::error::{Error as PlatformAuthError, ErrorKind as PlatformAuthErrorKind};
use platform_auth::Platform;
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field holds the original error from the lower layer.
/// `web` maps the `error_kind`s to HTTP status codes and never depends on
/// `entity_api` or `platform_auth` errors directly.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Account(AccountErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    Other(String),
}

/// Entity errors translated from `entity_api`, reduced to what the domain cares about.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    DbTransaction,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Other(String),
}

/// Failures a user can act on: the account is missing or must be reconnected.
#[derive(Debug, PartialEq)]
pub enum AccountErrorKind {
    NotConnected(Platform),
    ReconnectRequired(Platform),
}

impl fmt::Display for AccountErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccountErrorKind::NotConnected(platform) => {
                write!(f, "No {} account connected", platform.display_name())
            }
            AccountErrorKind::ReconnectRequired(platform) => write!(
                f,
                "Failed to get valid access token. Please reconnect your {} account.",
                platform.display_name()
            ),
        }
    }
}

impl Error {
    pub fn account(kind: AccountErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Account(kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            DomainErrorKind::Account(kind) => write!(f, "{kind}"),
            _ => match &self.source {
                Some(source) => write!(f, "Domain Error: {:?} ({})", self.error_kind, source),
                None => write!(f, "Domain Error: {:?}", self.error_kind),
            },
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::RecordNotUpdated => EntityErrorKind::Invalid,
            EntityApiErrorKind::SystemError => EntityErrorKind::DbTransaction,
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<PlatformAuthError> for Error {
    fn from(err: PlatformAuthError) -> Self {
        let error_kind = match &err.error_kind {
            PlatformAuthErrorKind::Config(_) => DomainErrorKind::Internal(InternalErrorKind::Config),
            PlatformAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
            PlatformAuthErrorKind::Refresh(_) => {
                DomainErrorKind::External(ExternalErrorKind::Other("Token refresh".to_string()))
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
