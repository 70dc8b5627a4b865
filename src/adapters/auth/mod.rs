//! Identity token adapters.
//!
//! - `BearerTokenCodec` / `IdTokenCodec` - HS256 JWTs for header and cookie transport
//! - `MockTokenCodec` - fixed tokens for tests

mod jwt;
mod mock;

pub use jwt::{
    BearerTokenCodec, Claims, IdTokenCodec, BEARER_AUDIENCE, DEFAULT_BEARER_TTL_SECS,
    DEFAULT_ID_TOKEN_TTL_SECS, ID_TOKEN_AUDIENCE,
};
pub use mock::MockTokenCodec;
