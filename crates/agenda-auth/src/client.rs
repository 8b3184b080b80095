use std::fmt;

use crate::credentials::ApplicationCredential;
use crate::storage::UserToken;

/// Where the bound token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cached,
    Interactive,
}

/// HTTP client bound to one credential and one user token.
pub struct AuthenticatedClient {
    credential: ApplicationCredential,
    token: UserToken,
    source: TokenSource,
    http: reqwest::Client,
}

impl AuthenticatedClient {
    pub fn new(
        credential: ApplicationCredential,
        token: UserToken,
        source: TokenSource,
        http: reqwest::Client,
    ) -> Self {
        Self {
            credential,
            token,
            source,
            http,
        }
    }

    pub fn credential(&self) -> &ApplicationCredential {
        &self.credential
    }

    pub fn token(&self) -> &UserToken {
        &self.token
    }

    pub fn source(&self) -> TokenSource {
        self.source
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Attach the bearer token to an outgoing request.
    pub fn sign(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(&self.token.access_token)
    }
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("credential", &self.credential)
            .field("token", &self.token)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
