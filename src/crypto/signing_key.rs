use std::fmt;

use hmac::{Hmac, Mac};

use sha2::Sha256;

use secrecy::Secret;

pub type HmacSha256 = Hmac<Sha256>;

/// Application-wide key for signing and verifying session tokens
#[derive(Clone)]
pub struct SigningKey(HmacSha256);

impl SigningKey {
    pub fn new(key: &Secret<String>) -> anyhow::Result<Self> {
        use secrecy::ExposeSecret;

        let key = key.expose_secret();
        if key.is_empty() {
            anyhow::bail!("Signing key cannot be empty");
        }

        let hmac = HmacSha256::new_from_slice(key.as_bytes())?;

        Ok(Self(hmac))
    }
}

impl AsRef<HmacSha256> for SigningKey {
    fn as_ref(&self) -> &HmacSha256 {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}
