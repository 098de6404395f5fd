pub mod connected_accounts;

/// A type alias that represents a connected account's id field data type.
/// Account ids are opaque strings minted by the OAuth callback flow.
pub type Id = String;
