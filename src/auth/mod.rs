use thiserror::Error;

pub mod claims;
pub mod extractors;
pub mod jwt;
pub mod password;

/// Response header carrying the authenticated user's id after login.
pub const USER_ID_HEADER: &str = "userid";

/// Why a token was rejected. Logged and asserted in tests; clients only
/// ever see a uniform forbidden response.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}
