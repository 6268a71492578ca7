use serde::{Deserialize, Serialize};

use crate::error::SascarError;
use crate::SascarResult;

/// Credentials for the client.
///
/// SasIntegra has no registration handshake, the username and password are
/// sent as plain parameters on every operation.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// The username of the integration account.
    pub username: String,
    /// The password of the integration account.
    pub password: String,
}

impl Credentials {
    /// Creates a new `Credentials` struct.
    ///
    /// Empty usernames or passwords are rejected.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> SascarResult<Credentials> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() || password.is_empty() {
            return Err(SascarError::MissingCredentials);
        }

        Ok(Credentials { username, password })
    }

    /// Reads credentials from the `SASCAR_USERNAME` and `SASCAR_PASSWORD`
    /// environment variables.
    pub fn from_env() -> SascarResult<Credentials> {
        Credentials::new(
            std::env::var("SASCAR_USERNAME").unwrap_or_default(),
            std::env::var("SASCAR_PASSWORD").unwrap_or_default(),
        )
    }
}

// The password must not leak into logs or error reports.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
