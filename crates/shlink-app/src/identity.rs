//! Signed-in user lookup through the reverse-proxy identity layer
//!
//! The proxy (e.g. oauth2-proxy) serves `/oauth2/userinfo` and
//! `/oauth2/sign_out` next to the console. Lookups are best effort: any failure
//! is reported as [`Identity::Unavailable`] and never retried.

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use shlink_core::prelude::*;

use crate::api::{build_client, http_error, read_json};
use crate::state::Identity;

/// Shown in place of the user when the lookup fails
pub const IDENTITY_FALLBACK: &str = "n/a";

const USERINFO_PATH: &str = "/oauth2/userinfo";
const SIGN_OUT_PATH: &str = "/oauth2/sign_out";

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
}

#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Email of the signed-in user
    async fn user_email(&self) -> Result<String>;

    /// Where the browser goes to end the session
    fn sign_out_url(&self) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: Option<Url>,
}

impl HttpIdentityProvider {
    pub fn new(base_url: Option<Url>, timeout_ms: u64) -> Self {
        Self {
            client: build_client(timeout_ms),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{}", base.as_str().trim_end_matches('/'), path))
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn user_email(&self) -> Result<String> {
        let url = self
            .endpoint(USERINFO_PATH)
            .ok_or_else(|| Error::identity("no identity endpoint configured"))?;

        let response = self.client.get(url).send().await.map_err(http_error)?;
        let info: UserInfo = read_json(response).await?;
        info.email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| Error::identity("userinfo response has no email"))
    }

    fn sign_out_url(&self) -> Option<String> {
        self.endpoint(SIGN_OUT_PATH)
    }
}

/// Look up the current user, mapping every failure to `Unavailable`
pub async fn resolve_identity<P: IdentityProvider>(provider: &P) -> Identity {
    match provider.user_email().await {
        Ok(email) => Identity::Email(email),
        Err(e) => {
            debug!("Identity lookup failed: {}", e);
            Identity::Unavailable
        }
    }
}
