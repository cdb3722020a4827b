mod session_token;
mod signing_key;

pub use session_token::{SessionToken, TokenError, TokenResult};
pub use signing_key::{HmacSha256, SigningKey};
