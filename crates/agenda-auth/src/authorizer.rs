//! Token acquisition: cached token first, interactive code exchange otherwise.

use agenda_core::{AuthError, Config, OAuthConfig};
use url::Url;

use crate::client::{AuthenticatedClient, TokenSource};
use crate::credentials::ApplicationCredential;
use crate::google::GoogleOAuth2Provider;
use crate::prompt::Prompt;
use crate::storage::{TokenStore, UserToken};

/// Progress of one `authorize` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Start,
    NoToken,
    Authorizing,
    Authorized,
    Failed,
}

impl AuthState {
    fn can_become(self, next: AuthState) -> bool {
        use AuthState::*;
        matches!(
            (self, next),
            (Start, Authorized)
                | (Start, NoToken)
                | (NoToken, Authorizing)
                | (Authorizing, Authorized)
                | (Authorizing, Failed)
        )
    }
}

pub struct Authorizer {
    store: TokenStore,
    oauth: OAuthConfig,
    http: reqwest::Client,
    transitions: Vec<AuthState>,
}

impl Authorizer {
    pub fn new(store: TokenStore, oauth: OAuthConfig) -> Self {
        Self {
            store,
            oauth,
            http: reqwest::Client::new(),
            transitions: vec![AuthState::Start],
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TokenStore::new(config.paths.token.clone()),
            config.oauth.clone(),
        )
    }

    /// Current state of the most recent `authorize` call.
    pub fn state(&self) -> AuthState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(AuthState::Start)
    }

    /// Every state visited by the most recent `authorize` call, in order.
    pub fn transitions(&self) -> &[AuthState] {
        &self.transitions
    }

    fn transition(&mut self, next: AuthState) {
        let current = self.state();
        debug_assert!(
            current.can_become(next),
            "invalid auth transition {:?} -> {:?}",
            current,
            next
        );
        tracing::debug!("auth state {:?} -> {:?}", current, next);
        self.transitions.push(next);
    }

    /// Produce a client bound to `credential` and a user token.
    ///
    /// A cached token is used as-is. Without one, the operator is sent to the
    /// consent page and asked (once) for the resulting code. Failing to save
    /// the new token is logged and does not affect the result.
    pub async fn authorize<P>(
        &mut self,
        credential: &ApplicationCredential,
        prompt: &mut P,
    ) -> Result<AuthenticatedClient, AuthError>
    where
        P: Prompt + ?Sized,
    {
        self.transitions = vec![AuthState::Start];

        if let Some(token) = self.store.load_cached_token() {
            self.transition(AuthState::Authorized);
            return Ok(self.bind(credential, token, TokenSource::Cached));
        }

        self.transition(AuthState::NoToken);
        self.transition(AuthState::Authorizing);

        let token = match self.exchange_interactively(credential, prompt).await {
            Ok(token) => token,
            Err(e) => {
                self.transition(AuthState::Failed);
                return Err(e);
            }
        };

        if let Err(e) = self.store.save_token(&token) {
            tracing::warn!("{}", e);
        }

        self.transition(AuthState::Authorized);
        Ok(self.bind(credential, token, TokenSource::Interactive))
    }

    async fn exchange_interactively<P>(
        &self,
        credential: &ApplicationCredential,
        prompt: &mut P,
    ) -> Result<UserToken, AuthError>
    where
        P: Prompt + ?Sized,
    {
        let provider =
            GoogleOAuth2Provider::new(credential.clone(), self.oauth.clone(), self.http.clone());
        let (auth_url, state) = provider.authorization_url();

        let answer = prompt.ask(&format!(
            "Authorize this app by visiting this URL:\n{}\n\nEnter the code from that page here: ",
            auth_url
        ))?;
        let code = extract_code(&answer, &state)?;

        let response = provider.exchange_code(&code).await?;
        Ok(response.into_user_token(chrono::Utc::now()))
    }

    fn bind(
        &self,
        credential: &ApplicationCredential,
        token: UserToken,
        source: TokenSource,
    ) -> AuthenticatedClient {
        AuthenticatedClient::new(credential.clone(), token, source, self.http.clone())
    }
}

/// Pull the authorization code out of what the operator pasted.
///
/// Accepts the bare code or the whole redirect URL the browser landed on.
fn extract_code(input: &str, expected_state: &str) -> Result<String, AuthError> {
    let input = input.trim();

    if let Ok(url) = Url::parse(input) {
        if matches!(url.scheme(), "http" | "https") {
            let mut code = None;
            let mut state = None;
            let mut error = None;
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "code" => code = Some(value.into_owned()),
                    "state" => state = Some(value.into_owned()),
                    "error" => error = Some(value.into_owned()),
                    _ => {}
                }
            }

            if let Some(error) = error {
                return Err(AuthError::TokenExchange(format!(
                    "authorization denied: {}",
                    error
                )));
            }
            if state.is_some_and(|s| s != expected_state) {
                return Err(AuthError::StateMismatch);
            }
            return code.filter(|c| !c.is_empty()).ok_or_else(|| {
                AuthError::TokenExchange("redirect URL has no code parameter".to_string())
            });
        }
    }

    if input.is_empty() {
        return Err(AuthError::TokenExchange(
            "empty authorization code".to_string(),
        ));
    }

    Ok(input.to_string())
}
