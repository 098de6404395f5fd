//! # platform-auth
//!
//! OAuth credential handling for the social platforms accounts are connected to:
//! - Token model with the expiry-with-buffer policy
//! - Static per-platform endpoint table and the runtime platform registry
//! - Refresh engine that exchanges a refresh token at a platform's token endpoint
//!
//! ## Architecture
//!
//! This crate has no knowledge of where accounts are stored. `domain` owns the
//! account registry and drives refreshes through the [`refresh::Refresher`] trait.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use platform_auth::{
//!     platform::Platform,
//!     registry::PlatformRegistry,
//!     refresh::{Refresher, TokenEndpointClient},
//! };
//! ```

pub mod error;
pub mod platform;
pub mod refresh;
pub mod registry;
pub mod tokens;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use platform::Platform;
pub use tokens::{RefreshResult, Tokens};
